use gpui::{Hsla, Rgba};
use theme::Color;

/// Convert a theme color for painting.
pub fn hsla(color: Color) -> Hsla {
    Rgba {
        r: color.red,
        g: color.green,
        b: color.blue,
        a: color.alpha,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::WithAlpha;
    use theme::rgb;

    #[test]
    fn keeps_alpha() {
        let color = hsla(rgb(255, 0, 0).with_alpha(0.25));
        assert!((color.a - 0.25).abs() < 1e-6);
        assert!(color.h.abs() < 1e-6);
    }

    #[test]
    fn white_is_fully_light() {
        let color = hsla(rgb(255, 255, 255));
        assert!((color.l - 1.0).abs() < 1e-6);
    }
}
