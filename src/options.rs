//! Typed option store.
//!
//! Options are a name-to-value map over a closed sum of value kinds, with a
//! per-key change signal. Accessing a key with the wrong typed getter is a
//! programmer error and panics with the option name and both kinds; it is
//! never reported through `Result`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::Color;
use crate::error::{TimingError, TimingResult};
use crate::signal::{Connection, Signal};

/// One option value. The set of kinds is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OptionValue {
    Str(String),
    Int(i64),
    Double(f64),
    Color(Color),
    Bool(bool),
    StrList(Vec<String>),
    IntList(Vec<i64>),
    DoubleList(Vec<f64>),
    ColorList(Vec<Color>),
    BoolList(Vec<bool>),
}

impl OptionValue {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            OptionValue::Str(_) => "string",
            OptionValue::Int(_) => "int",
            OptionValue::Double(_) => "double",
            OptionValue::Color(_) => "color",
            OptionValue::Bool(_) => "bool",
            OptionValue::StrList(_) => "string list",
            OptionValue::IntList(_) => "int list",
            OptionValue::DoubleList(_) => "double list",
            OptionValue::ColorList(_) => "color list",
            OptionValue::BoolList(_) => "bool list",
        }
    }
}

#[derive(Debug)]
struct OptionEntry {
    value: OptionValue,
    default: OptionValue,
    changed: Signal<OptionValue>,
}

/// Name-keyed option map with change notification.
///
/// Iteration and serialization follow registration order, so JSON snapshots
/// are stable across runs.
#[derive(Debug, Default)]
pub struct OptionStore {
    entries: IndexMap<String, OptionEntry>,
}

impl OptionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with every option the audio timing engine reads.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut store = Self::new();
        store.register("Audio/Snap/Enable", OptionValue::Bool(false));
        store.register("Audio/Snap/Distance", OptionValue::Int(10));
        store.register("Audio/Start Drag Sensitivity", OptionValue::Int(6));
        store.register("Audio/Auto/Commit", OptionValue::Bool(true));
        store.register("Audio/Auto/Scroll", OptionValue::Bool(true));
        store.register("Audio/Auto/Focus", OptionValue::Bool(true));
        store.register("Audio/Lock Scroll on Cursor", OptionValue::Bool(false));
        store.register("Audio/Smooth Scrolling", OptionValue::Bool(false));
        store.register("Audio/Lead/IN", OptionValue::Int(200));
        store.register("Audio/Lead/OUT", OptionValue::Int(300));
        store.register("Audio/Display/Draw/Cursor Time", OptionValue::Bool(true));
        store.register("Audio/Display/Draw/Inactive Comments", OptionValue::Bool(true));
        store.register("Audio/Display/Draw/Keyframes", OptionValue::Bool(true));
        store.register("Audio/Drag Timing", OptionValue::Bool(true));
        store.register("Audio/Spectrum", OptionValue::Bool(false));
        store.register("Audio/Renderer/Spectrum/Quality", OptionValue::Int(1));
        store.register("Timing/Default Duration", OptionValue::Int(2000));
        store
    }

    /// Registers a key with its default value. Re-registering replaces the
    /// default but keeps the current value and subscribers.
    pub fn register(&mut self, name: &str, default: OptionValue) {
        match self.entries.get_mut(name) {
            Some(entry) => entry.default = default,
            None => {
                self.entries.insert(
                    name.to_owned(),
                    OptionEntry {
                        value: default.clone(),
                        default,
                        changed: Signal::new(),
                    },
                );
            }
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn entry(&self, name: &str) -> &OptionEntry {
        self.entries
            .get(name)
            .unwrap_or_else(|| panic!("unknown option `{name}`"))
    }

    fn entry_mut(&mut self, name: &str) -> &mut OptionEntry {
        self.entries
            .get_mut(name)
            .unwrap_or_else(|| panic!("unknown option `{name}`"))
    }

    #[track_caller]
    fn kind_mismatch(name: &str, expected: &str, actual: &OptionValue) -> ! {
        panic!(
            "option `{name}`: expected {expected}, found {}",
            actual.kind_name()
        )
    }

    #[must_use]
    #[track_caller]
    pub fn get_bool(&self, name: &str) -> bool {
        match &self.entry(name).value {
            OptionValue::Bool(v) => *v,
            other => Self::kind_mismatch(name, "bool", other),
        }
    }

    #[must_use]
    #[track_caller]
    pub fn get_int(&self, name: &str) -> i64 {
        match &self.entry(name).value {
            OptionValue::Int(v) => *v,
            other => Self::kind_mismatch(name, "int", other),
        }
    }

    #[must_use]
    #[track_caller]
    pub fn get_double(&self, name: &str) -> f64 {
        match &self.entry(name).value {
            OptionValue::Double(v) => *v,
            other => Self::kind_mismatch(name, "double", other),
        }
    }

    #[must_use]
    #[track_caller]
    pub fn get_str(&self, name: &str) -> &str {
        match &self.entry(name).value {
            OptionValue::Str(v) => v,
            other => Self::kind_mismatch(name, "string", other),
        }
    }

    #[must_use]
    #[track_caller]
    pub fn get_color(&self, name: &str) -> Color {
        match &self.entry(name).value {
            OptionValue::Color(v) => *v,
            other => Self::kind_mismatch(name, "color", other),
        }
    }

    #[track_caller]
    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.set_value(name, OptionValue::Bool(value));
    }

    #[track_caller]
    pub fn set_int(&mut self, name: &str, value: i64) {
        self.set_value(name, OptionValue::Int(value));
    }

    #[track_caller]
    pub fn set_double(&mut self, name: &str, value: f64) {
        self.set_value(name, OptionValue::Double(value));
    }

    #[track_caller]
    pub fn set_str(&mut self, name: &str, value: impl Into<String>) {
        self.set_value(name, OptionValue::Str(value.into()));
    }

    #[track_caller]
    pub fn set_color(&mut self, name: &str, value: Color) {
        self.set_value(name, OptionValue::Color(value));
    }

    /// Replaces a value, keeping the registered kind. Notifies subscribers.
    #[track_caller]
    pub fn set_value(&mut self, name: &str, value: OptionValue) {
        let entry = self.entry_mut(name);
        if entry.value.kind_name() != value.kind_name() {
            Self::kind_mismatch(name, entry.value.kind_name(), &value);
        }
        entry.value = value;
        let value = entry.value.clone();
        entry.changed.emit(&value);
    }

    /// Restores a key to its registered default. Notifies subscribers.
    pub fn reset(&mut self, name: &str) {
        let entry = self.entry_mut(name);
        entry.value = entry.default.clone();
        let value = entry.value.clone();
        entry.changed.emit(&value);
    }

    /// Subscribes to changes of one key.
    #[track_caller]
    pub fn subscribe(&self, name: &str, callback: impl FnMut(&OptionValue) + 'static) -> Connection {
        self.entry(name).changed.connect(callback)
    }

    /// Serializes every current value to pretty JSON in registration order.
    pub fn to_json_pretty(&self) -> TimingResult<String> {
        let map: IndexMap<&str, &OptionValue> = self
            .entries
            .iter()
            .map(|(name, entry)| (name.as_str(), &entry.value))
            .collect();
        serde_json::to_string_pretty(&map)
            .map_err(|e| TimingError::InvalidData(format!("failed to serialize options: {e}")))
    }

    /// Loads values from JSON produced by [`OptionStore::to_json_pretty`].
    ///
    /// Unknown keys are ignored; a kind mismatch on a known key panics like
    /// any other type-confused access.
    pub fn load_json_str(&mut self, input: &str) -> TimingResult<()> {
        let map: IndexMap<String, OptionValue> = serde_json::from_str(input)
            .map_err(|e| TimingError::InvalidData(format!("failed to parse options: {e}")))?;
        for (name, value) in map {
            if self.contains(&name) {
                self.set_value(&name, value);
            }
        }
        Ok(())
    }
}
