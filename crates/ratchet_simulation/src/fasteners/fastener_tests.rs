//! Tests for fastener state and tool compatibility.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::fasteners::components::*;

    fn bolt_10mm() -> Fastener {
        Fastener::new(FastenerSettings::sized(FastenerSize::Mm10), None)
    }

    #[test]
    fn test_tool_compatibility_truth_table() {
        let bolt = bolt_10mm();

        // free-hand + совпадающий размер → false
        let free_hand_match = ToolContext {
            free_hand: true,
            tool_size: Some(FastenerSize::Mm10),
        };
        assert!(!bolt.tool_compatible(&free_hand_match));

        // ключ + совпадающий размер → true
        assert!(bolt.tool_compatible(&ToolContext::wrench(FastenerSize::Mm10)));

        // ключ + другой размер → false
        assert!(!bolt.tool_compatible(&ToolContext::wrench(FastenerSize::Mm11)));

        // free-hand без ключа → false
        assert!(!bolt.tool_compatible(&ToolContext::free_hand()));
    }

    #[test]
    fn test_set_tightness_requires_compatible_tool() {
        let mut bolt = bolt_10mm();

        assert_eq!(
            bolt.set_tightness(&ToolContext::wrench(FastenerSize::Mm8), 3.0),
            Err(FastenerError::ToolIncompatible)
        );
        assert_eq!(bolt.tightness(), 0.0);

        assert_eq!(bolt.set_tightness(&ToolContext::wrench(FastenerSize::Mm10), 3.0), Ok(3.0));
        assert_eq!(bolt.tightness(), 3.0);
    }

    #[test]
    fn test_tightness_clamped_to_max() {
        let mut bolt = bolt_10mm();
        let wrench = ToolContext::wrench(FastenerSize::Mm10);

        assert_eq!(bolt.set_tightness(&wrench, 100.0), Ok(8.0));
        assert_eq!(bolt.set_tightness(&wrench, -5.0), Ok(0.0));
    }

    #[test]
    fn test_nut_tightness_only_with_nut() {
        let mut bolt = bolt_10mm();
        let wrench = ToolContext::wrench(FastenerSize::Mm10);

        assert!(!bolt.has_nut());
        assert_eq!(bolt.nut_tightness(), None);
        assert_eq!(bolt.set_nut_tightness(&wrench, 1.0), Err(FastenerError::NoNut));
    }

    #[test]
    fn test_nut_uses_own_size() {
        let settings = FastenerSettings::sized(FastenerSize::Mm10).with_nut(FastenerSize::Mm12, 0.05);
        let mut bolt = Fastener::new(settings, None);

        assert!(bolt.has_nut());
        assert_eq!(bolt.nut_tightness(), Some(0.0));
        assert_eq!(
            bolt.set_nut_tightness(&ToolContext::wrench(FastenerSize::Mm10), 2.0),
            Err(FastenerError::ToolIncompatible)
        );
        assert_eq!(bolt.set_nut_tightness(&ToolContext::wrench(FastenerSize::Mm12), 2.0), Ok(2.0));
    }

    #[test]
    fn test_fully_tight_needs_bolt_and_nut() {
        let settings = FastenerSettings::sized(FastenerSize::Mm10).with_nut(FastenerSize::Mm10, 0.05);
        let mut bolt = Fastener::new(settings, None);
        let wrench = ToolContext::wrench(FastenerSize::Mm10);

        bolt.set_tightness(&wrench, 8.0).unwrap();
        assert!(!bolt.is_fully_tight());

        bolt.set_nut_tightness(&wrench, 8.0).unwrap();
        assert!(bolt.is_fully_tight());
    }

    #[test]
    fn test_save_info_restores_tightness() {
        let save = FastenerSaveInfo {
            tightness: 4.0,
            nut_tightness: 2.0,
        };
        let settings = FastenerSettings::sized(FastenerSize::Mm13).with_nut(FastenerSize::Mm13, 0.0);
        let bolt = Fastener::new(settings, Some(save));

        assert_eq!(bolt.tightness(), 4.0);
        assert_eq!(bolt.nut_tightness(), Some(2.0));
        assert_eq!(bolt.save_info(), save);
    }

    #[test]
    fn test_nut_pose_offset_along_direction() {
        let settings = FastenerSettings {
            pos_direction: Vec3::new(0.0, 0.0, -2.0),
            ..FastenerSettings::sized(FastenerSize::Mm10)
        }
        .with_nut(FastenerSize::Mm10, 0.1);
        let bolt = Fastener::new(settings, None).with_start_pose(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO);

        let nut = bolt.nut_transform().expect("bolt has a nut");
        assert!((nut.translation - Vec3::new(1.0, 0.0, -0.1)).length() < 1e-5);
    }

    #[test]
    fn test_size_millimeters() {
        assert_eq!(FastenerSize::Mm5.millimeters(), 5);
        assert_eq!(FastenerSize::Mm15.millimeters(), 15);
    }
}
