use bitflags::bitflags;

/// Material light-transport category, processed independently of the other
/// two.
///
/// Each closure class gets its own set of passes and its own persistent
/// denoising history; the pipeline never mixes radiance between classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClosureClass {
    Diffuse,
    Reflection,
    Refraction,
}

impl ClosureClass {
    pub const ALL: [Self; 3] =
        [Self::Diffuse, Self::Reflection, Self::Refraction];

    pub const COUNT: usize = 3;

    /// Index into per-closure lookup tables (pass handles, persistent
    /// buffers, uniform snapshots, tile-mask layers).
    pub fn index(self) -> usize {
        match self {
            Self::Diffuse => 0,
            Self::Reflection => 1,
            Self::Refraction => 2,
        }
    }

    pub fn mask(self) -> ClosureMask {
        match self {
            Self::Diffuse => ClosureMask::DIFFUSE,
            Self::Reflection => ClosureMask::REFLECTION,
            Self::Refraction => ClosureMask::REFRACTION,
        }
    }
}

bitflags! {
    /// Set of closure classes active in the current frame's G-buffer.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ClosureMask: u32 {
        const DIFFUSE = 1 << 0;
        const REFLECTION = 1 << 1;
        const REFRACTION = 1 << 2;
    }
}

impl ClosureMask {
    /// Whether the mask selects exactly one closure class.
    ///
    /// A trace invocation operates on a single class; combinations are
    /// rejected by the caller through `debug_assert!`s on this.
    pub fn is_single(self) -> bool {
        self.bits().count_ones() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_stable() {
        for (idx, closure) in ClosureClass::ALL.iter().enumerate() {
            assert_eq!(idx, closure.index());
        }
    }

    #[test]
    fn masks_are_disjoint_and_single() {
        for closure in ClosureClass::ALL {
            assert!(closure.mask().is_single());
        }

        assert!(!ClosureMask::empty().is_single());
        assert!(!(ClosureMask::DIFFUSE | ClosureMask::REFRACTION).is_single());
    }
}
