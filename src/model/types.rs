use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

/// A chemical element, identified by atomic number.
///
/// Atomic number 0 is the SMILES wildcard atom `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(u8);

// (symbol, average atomic mass) indexed by atomic number.
static PERIODIC_TABLE: [(&str, f64); 119] = [
    ("*", 0.0),
    ("H", 1.008),
    ("He", 4.003),
    ("Li", 6.941),
    ("Be", 9.012),
    ("B", 10.812),
    ("C", 12.011),
    ("N", 14.007),
    ("O", 15.999),
    ("F", 18.998),
    ("Ne", 20.18),
    ("Na", 22.99),
    ("Mg", 24.305),
    ("Al", 26.982),
    ("Si", 28.086),
    ("P", 30.974),
    ("S", 32.067),
    ("Cl", 35.453),
    ("Ar", 39.948),
    ("K", 39.098),
    ("Ca", 40.078),
    ("Sc", 44.956),
    ("Ti", 47.867),
    ("V", 50.942),
    ("Cr", 51.996),
    ("Mn", 54.938),
    ("Fe", 55.845),
    ("Co", 58.933),
    ("Ni", 58.693),
    ("Cu", 63.546),
    ("Zn", 65.39),
    ("Ga", 69.723),
    ("Ge", 72.61),
    ("As", 74.922),
    ("Se", 78.96),
    ("Br", 79.904),
    ("Kr", 83.8),
    ("Rb", 85.468),
    ("Sr", 87.62),
    ("Y", 88.906),
    ("Zr", 91.224),
    ("Nb", 92.906),
    ("Mo", 95.94),
    ("Tc", 98.0),
    ("Ru", 101.07),
    ("Rh", 102.906),
    ("Pd", 106.42),
    ("Ag", 107.868),
    ("Cd", 112.412),
    ("In", 114.818),
    ("Sn", 118.711),
    ("Sb", 121.76),
    ("Te", 127.6),
    ("I", 126.904),
    ("Xe", 131.29),
    ("Cs", 132.905),
    ("Ba", 137.328),
    ("La", 138.906),
    ("Ce", 140.116),
    ("Pr", 140.908),
    ("Nd", 144.24),
    ("Pm", 145.0),
    ("Sm", 150.36),
    ("Eu", 151.964),
    ("Gd", 157.25),
    ("Tb", 158.925),
    ("Dy", 162.5),
    ("Ho", 164.93),
    ("Er", 167.26),
    ("Tm", 168.934),
    ("Yb", 173.04),
    ("Lu", 174.967),
    ("Hf", 178.49),
    ("Ta", 180.948),
    ("W", 183.84),
    ("Re", 186.207),
    ("Os", 190.23),
    ("Ir", 192.217),
    ("Pt", 195.078),
    ("Au", 196.967),
    ("Hg", 200.59),
    ("Tl", 204.383),
    ("Pb", 207.2),
    ("Bi", 208.98),
    ("Po", 209.0),
    ("At", 210.0),
    ("Rn", 222.0),
    ("Fr", 223.0),
    ("Ra", 226.0),
    ("Ac", 227.0),
    ("Th", 232.038),
    ("Pa", 231.036),
    ("U", 238.029),
    ("Np", 237.0),
    ("Pu", 244.0),
    ("Am", 243.0),
    ("Cm", 247.0),
    ("Bk", 247.0),
    ("Cf", 251.0),
    ("Es", 252.0),
    ("Fm", 257.0),
    ("Md", 258.0),
    ("No", 259.0),
    ("Lr", 262.0),
    ("Rf", 267.0),
    ("Db", 268.0),
    ("Sg", 271.0),
    ("Bh", 272.0),
    ("Hs", 270.0),
    ("Mt", 276.0),
    ("Ds", 281.0),
    ("Rg", 280.0),
    ("Cn", 285.0),
    ("Nh", 284.0),
    ("Fl", 289.0),
    ("Mc", 288.0),
    ("Lv", 293.0),
    ("Ts", 294.0),
    ("Og", 294.0),
];

impl Element {
    pub const DUMMY: Element = Element(0);
    pub const H: Element = Element(1);
    pub const B: Element = Element(5);
    pub const C: Element = Element(6);
    pub const N: Element = Element(7);
    pub const O: Element = Element(8);
    pub const F: Element = Element(9);
    pub const SI: Element = Element(14);
    pub const P: Element = Element(15);
    pub const S: Element = Element(16);
    pub const CL: Element = Element(17);
    pub const AS: Element = Element(33);
    pub const SE: Element = Element(34);
    pub const BR: Element = Element(35);
    pub const TE: Element = Element(52);
    pub const I: Element = Element(53);

    pub fn from_atomic_number(z: u8) -> Option<Self> {
        ((z as usize) < PERIODIC_TABLE.len()).then_some(Self(z))
    }

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        self.0
    }

    pub fn symbol(&self) -> &'static str {
        PERIODIC_TABLE[self.0 as usize].0
    }

    pub fn atomic_mass(&self) -> f64 {
        PERIODIC_TABLE[self.0 as usize].1
    }

    /// Atoms counted as heavy atoms (anything heavier than hydrogen).
    #[inline]
    pub fn is_heavy(&self) -> bool {
        self.0 > 1
    }

    #[inline]
    pub fn is_halogen(&self) -> bool {
        matches!(self.0, 9 | 17 | 35 | 53 | 85)
    }

    /// Nitrogen, oxygen, phosphorus or sulfur.
    #[inline]
    pub fn is_nops(&self) -> bool {
        matches!(self.0, 7 | 8 | 15 | 16)
    }

    /// Allowed neutral valences for elements with a conventional valence model.
    ///
    /// Returns `None` for elements (metals, noble gases, the wildcard) whose
    /// valence is not checked.
    pub fn default_valences(&self) -> Option<&'static [u8]> {
        match self.0 {
            1 => Some(&[1]),
            5 => Some(&[3]),
            6 => Some(&[4]),
            7 => Some(&[3]),
            8 => Some(&[2]),
            9 => Some(&[1]),
            14 => Some(&[4]),
            15 => Some(&[3, 5, 7]),
            16 => Some(&[2, 4, 6]),
            17 => Some(&[1]),
            33 => Some(&[3, 5, 7]),
            34 => Some(&[2, 4, 6]),
            35 => Some(&[1]),
            52 => Some(&[2, 4, 6]),
            53 => Some(&[1, 3, 5]),
            _ => None,
        }
    }

    /// Valences for a charged atom, taken from its isoelectronic neighbour
    /// (N+ behaves like C, O- like F, and so on).
    pub fn valences_with_charge(&self, charge: i8) -> Option<&'static [u8]> {
        let shifted = self.0 as i16 - charge as i16;
        if shifted <= 0 {
            return None;
        }
        let shifted = Element(u8::try_from(shifted).ok()?);
        if charge == 0 || same_period(self.0, shifted.0) {
            shifted.default_valences()
        } else {
            None
        }
    }
}

fn period(z: u8) -> u8 {
    match z {
        0 => 0,
        1..=2 => 1,
        3..=10 => 2,
        11..=18 => 3,
        19..=36 => 4,
        37..=54 => 5,
        55..=86 => 6,
        _ => 7,
    }
}

fn same_period(a: u8, b: u8) -> bool {
    period(a) == period(b)
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PERIODIC_TABLE
            .iter()
            .position(|(symbol, _)| *symbol == s)
            .map(|z| Element(z as u8))
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl BondOrder {
    /// Integer valence contribution; aromatic bonds count as one and the
    /// shared pi electron is accounted for per atom.
    pub fn valence(&self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 4,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            BondOrder::Single => '-',
            BondOrder::Double => '=',
            BondOrder::Triple => '#',
            BondOrder::Quadruple => '$',
            BondOrder::Aromatic => ':',
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BondOrder::Single => "Single",
            BondOrder::Double => "Double",
            BondOrder::Triple => "Triple",
            BondOrder::Quadruple => "Quadruple",
            BondOrder::Aromatic => "Aromatic",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn element_from_str_valid() {
        assert_eq!(Element::from_str("H").unwrap(), Element::H);
        assert_eq!(Element::from_str("Cl").unwrap(), Element::CL);
        assert_eq!(Element::from_str("Og").unwrap().atomic_number(), 118);
        assert_eq!(Element::from_str("*").unwrap(), Element::DUMMY);
    }

    #[test]
    fn element_from_str_invalid_case() {
        let err = Element::from_str("cl").unwrap_err();
        assert_eq!(err.to_string(), "invalid or unsupported element symbol: 'cl'");
    }

    #[test]
    fn element_symbol_display_and_atomic_number() {
        let el = Element::from_atomic_number(11).unwrap();
        assert_eq!(el.symbol(), "Na");
        assert_eq!(el.to_string(), "Na");
        assert!(Element::from_atomic_number(119).is_none());
    }

    #[test]
    fn atomic_mass_values() {
        assert!(approx_eq(Element::H.atomic_mass(), 1.008, 1e-9));
        assert!(approx_eq(Element::C.atomic_mass(), 12.011, 1e-9));
        assert!(approx_eq(Element::S.atomic_mass(), 32.067, 1e-9));
        assert!(approx_eq(Element::DUMMY.atomic_mass(), 0.0, 1e-9));
    }

    #[test]
    fn heavy_atom_classification() {
        assert!(!Element::H.is_heavy());
        assert!(!Element::DUMMY.is_heavy());
        assert!(Element::C.is_heavy());
        assert!(Element::BR.is_halogen());
        assert!(!Element::O.is_halogen());
    }

    #[test]
    fn charged_valences_follow_isoelectronic_element() {
        assert_eq!(Element::N.valences_with_charge(1), Some(&[4u8][..]));
        assert_eq!(Element::O.valences_with_charge(-1), Some(&[1u8][..]));
        assert_eq!(Element::O.valences_with_charge(1), Some(&[3u8][..]));
        assert_eq!(Element::C.valences_with_charge(-1), Some(&[3u8][..]));
        assert_eq!(Element::B.valences_with_charge(-1), Some(&[4u8][..]));
        assert_eq!(Element::from_str("Na").unwrap().valences_with_charge(1), None);
    }

    #[test]
    fn bond_order_valence_and_display() {
        assert_eq!(BondOrder::Single.valence(), 1);
        assert_eq!(BondOrder::Double.valence(), 2);
        assert_eq!(BondOrder::Triple.valence(), 3);
        assert_eq!(BondOrder::Aromatic.valence(), 1);
        assert_eq!(BondOrder::Aromatic.to_string(), "Aromatic");
        assert_eq!(BondOrder::Double.symbol(), '=');
    }
}
