//! Named color palettes.

use fp_core::Rgb;

use crate::schema::PaletteName;

const fn rgb8(r: u8, g: u8, b: u8) -> Rgb {
    Rgb::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
}

/// MATLAB-style default line colors.
pub const LINES: [Rgb; 7] = [
    Rgb::new(0.000, 0.447, 0.741),
    Rgb::new(0.850, 0.325, 0.098),
    Rgb::new(0.929, 0.694, 0.125),
    Rgb::new(0.494, 0.184, 0.556),
    Rgb::new(0.466, 0.674, 0.188),
    Rgb::new(0.301, 0.745, 0.933),
    Rgb::new(0.635, 0.078, 0.184),
];

pub const TAB10: [Rgb; 10] = [
    rgb8(0x1f, 0x77, 0xb4),
    rgb8(0xff, 0x7f, 0x0e),
    rgb8(0x2c, 0xa0, 0x2c),
    rgb8(0xd6, 0x27, 0x28),
    rgb8(0x94, 0x67, 0xbd),
    rgb8(0x8c, 0x56, 0x4b),
    rgb8(0xe3, 0x77, 0xc2),
    rgb8(0x7f, 0x7f, 0x7f),
    rgb8(0xbc, 0xbd, 0x22),
    rgb8(0x17, 0xbe, 0xcf),
];

/// Color-blind safe palette (Okabe & Ito), without black.
pub const OKABE_ITO: [Rgb; 7] = [
    rgb8(230, 159, 0),
    rgb8(86, 180, 233),
    rgb8(0, 158, 115),
    rgb8(240, 228, 66),
    rgb8(0, 114, 178),
    rgb8(213, 94, 0),
    rgb8(204, 121, 167),
];

/// Six evenly spaced viridis samples.
pub const VIRIDIS: [Rgb; 6] = [
    rgb8(68, 1, 84),
    rgb8(65, 68, 135),
    rgb8(42, 120, 142),
    rgb8(34, 168, 132),
    rgb8(122, 209, 81),
    rgb8(253, 231, 37),
];

pub const GRAYSCALE: [Rgb; 5] = [
    Rgb::new(0.0, 0.0, 0.0),
    Rgb::new(0.3, 0.3, 0.3),
    Rgb::new(0.5, 0.5, 0.5),
    Rgb::new(0.65, 0.65, 0.65),
    Rgb::new(0.8, 0.8, 0.8),
];

/// Colors of `name`. `custom` is used only for [`PaletteName::Custom`]; an
/// empty custom list yields an empty palette, which the resolver rejects.
pub fn palette_colors(name: PaletteName, custom: &[Rgb]) -> Vec<Rgb> {
    match name {
        PaletteName::Lines => LINES.to_vec(),
        PaletteName::Tab10 => TAB10.to_vec(),
        PaletteName::OkabeIto => OKABE_ITO.to_vec(),
        PaletteName::Viridis => VIRIDIS.to_vec(),
        PaletteName::Grayscale => GRAYSCALE.to_vec(),
        PaletteName::Custom => custom.to_vec(),
    }
}
