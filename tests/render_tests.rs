use cuetime_rs::options::OptionStore;
use cuetime_rs::render::{RendererKind, renderer_kind_from_options, spectrum_resolution};

#[test]
fn renderer_choice_follows_the_spectrum_option() {
    let mut options = OptionStore::with_defaults();
    assert_eq!(renderer_kind_from_options(&options), RendererKind::Waveform);
    options.set_bool("Audio/Spectrum", true);
    assert_eq!(renderer_kind_from_options(&options), RendererKind::Spectrum);
}

#[test]
fn spectrum_resolution_table() {
    assert_eq!(spectrum_resolution(0), (8, 8));
    assert_eq!(spectrum_resolution(3), (9, 6));
    assert_eq!(spectrum_resolution(5), (11, 5));
    // Out-of-range quality clamps to the table.
    assert_eq!(spectrum_resolution(-3), (8, 8));
    assert_eq!(spectrum_resolution(99), (11, 5));
}
