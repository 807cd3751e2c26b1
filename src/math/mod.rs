mod mat3;
mod point;

pub use mat3::Mat3;
pub use point::Point;

pub const PI: f32 = std::f32::consts::PI;

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_matrix() {
        let identity = Mat3::identity();
        let result = identity.transform_point(Point::new(1.0, 2.0));

        assert!((result.x - 1.0).abs() < 0.001);
        assert!((result.y - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_translation_matrix() {
        let translation = Mat3::from_translation(10.0, 20.0);
        let result = translation.transform_point(Point::new(1.0, 2.0));

        assert!((result.x - 11.0).abs() < 0.001);
        assert!((result.y - 22.0).abs() < 0.001);
    }

    #[test]
    fn test_matrix_multiplication() {
        let identity = Mat3::identity();
        let translation = Mat3::from_translation(1.0, 2.0);

        assert_eq!(identity * translation, translation);
    }

    #[test]
    fn test_scale_then_translate() {
        let m = Mat3::from_translation(5.0, 0.0) * Mat3::from_scale(2.0, 3.0);
        let result = m.transform_point(Point::new(1.0, 1.0));

        assert!((result.x - 7.0).abs() < 0.001);
        assert!((result.y - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
        assert_eq!(clamp(7.0, 0.0, 1.0), 1.0);
    }
}
