use super::types::Element;

/// A heavy atom (or an unfoldable hydrogen) in a molecular graph.
///
/// Hydrogens attached to the atom are carried as a count rather than as
/// separate graph nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub element: Element,
    pub charge: i8,
    pub isotope: Option<u16>,
    pub aromatic: bool,
    /// Total attached hydrogens (explicit, implicit and folded).
    pub hydrogens: u8,
    /// Written as a bracket atom; bracket atoms never receive implicit hydrogens.
    pub bracket: bool,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            charge: 0,
            isotope: None,
            aromatic: false,
            hydrogens: 0,
            bracket: false,
        }
    }

    pub fn aromatic(element: Element) -> Self {
        Self {
            aromatic: true,
            ..Self::new(element)
        }
    }

    #[inline]
    pub fn is(&self, element: Element) -> bool {
        self.element == element
    }
}
