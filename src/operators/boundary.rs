//! Box-constraint repair

use serde::{Deserialize, Serialize};

use crate::genome::bounds::MultiBounds;

/// How out-of-bounds coordinates are brought back inside the box
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryHandling {
    /// Clamp to the nearest bound
    #[default]
    Clip,
    /// Mirror at the violated bound, then clamp if still outside
    Reflect,
}

impl BoundaryHandling {
    /// Repair `position` in place
    pub fn apply(&self, position: &mut [f64], bounds: &MultiBounds) {
        match self {
            Self::Clip => bounds.clamp_vec(position),
            Self::Reflect => bounds.reflect_vec(position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::bounds::Bounds;

    #[test]
    fn test_clip() {
        let bounds = MultiBounds::uniform(Bounds::new(0.0, 1.0), 3);
        let mut x = vec![-0.2, 0.5, 1.3];
        BoundaryHandling::Clip.apply(&mut x, &bounds);
        assert_eq!(x, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_reflect() {
        let bounds = MultiBounds::uniform(Bounds::new(0.0, 1.0), 3);
        let mut x = vec![-0.25, 0.5, 1.25];
        BoundaryHandling::Reflect.apply(&mut x, &bounds);
        assert_eq!(x, vec![0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_reflect_far_outside_is_clamped() {
        let bounds = MultiBounds::uniform(Bounds::new(0.0, 1.0), 1);
        let mut x = vec![5.0];
        BoundaryHandling::Reflect.apply(&mut x, &bounds);
        assert_eq!(x, vec![0.0]);
    }
}
