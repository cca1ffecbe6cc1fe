//! Change flags carried by manager messages.

use bitflags::bitflags;

bitflags! {
    /// What changed about a managed object.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChangeFlags: u32 {
        /// Object added to the manager.
        const ADD = 1 << 0;
        /// Object removed from the manager.
        const REMOVE = 1 << 1;
        /// Object renamed.
        const IDENTIFIER = 1 << 2;
        /// One of the object's own attributes changed.
        const DEFINITION = 1 << 3;
        /// Something the object depends on changed.
        const DEPENDENCY = 1 << 4;
        /// Anything affecting what the object produces.
        const RESULT = Self::DEFINITION.bits() | Self::DEPENDENCY.bits();
        /// Owner is being destroyed; sent once to notifiers.
        const FINAL = 1 << 15;
    }
}

impl ChangeFlags {
    /// True if the change affects results (definition or dependency).
    pub fn affects_result(self) -> bool {
        self.intersects(Self::RESULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_combines_definition_and_dependency() {
        assert!(ChangeFlags::RESULT.contains(ChangeFlags::DEFINITION));
        assert!(ChangeFlags::RESULT.contains(ChangeFlags::DEPENDENCY));
        assert!(ChangeFlags::DEPENDENCY.affects_result());
        assert!(!ChangeFlags::IDENTIFIER.affects_result());
        assert!(ChangeFlags::empty().is_empty());
    }
}
