use std::collections::HashMap;

use super::error::Error;
use super::{AtomExpr, AtomPrimitive, BondExpr, BondPrimitive, Pattern, QueryBond};
use crate::model::types::Element;

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

/// State of one query graph; recursive environments get their own.
#[derive(Default)]
struct Chain {
    atoms: Vec<AtomExpr>,
    bonds: Vec<QueryBond>,
    prev: Option<usize>,
    pending_bond: Option<(BondExpr, usize)>,
    branches: Vec<(usize, usize)>,
    rings: HashMap<u16, (usize, Option<BondExpr>)>,
}

/// Compiles a SMARTS string into a query graph.
pub fn parse_smarts(smarts: &str) -> Result<Pattern, Error> {
    let mut parser = Parser {
        input: smarts.as_bytes(),
        pos: 0,
    };
    let pattern = parser.pattern()?;
    match parser.peek() {
        Some(c) => Err(Error::unexpected(c as char, parser.pos)),
        None => Ok(pattern),
    }
}

fn and(mut terms: Vec<AtomExpr>) -> AtomExpr {
    if terms.len() == 1 {
        terms.remove(0)
    } else {
        AtomExpr::And(terms)
    }
}

fn or(mut terms: Vec<AtomExpr>) -> AtomExpr {
    if terms.len() == 1 {
        terms.remove(0)
    } else {
        AtomExpr::Or(terms)
    }
}

fn bond_and(mut terms: Vec<BondExpr>) -> BondExpr {
    if terms.len() == 1 {
        terms.remove(0)
    } else {
        BondExpr::And(terms)
    }
}

fn bond_or(mut terms: Vec<BondExpr>) -> BondExpr {
    if terms.len() == 1 {
        terms.remove(0)
    } else {
        BondExpr::Or(terms)
    }
}

fn is_bond_primitive(c: u8) -> bool {
    matches!(c, b'-' | b'=' | b'#' | b':' | b'~' | b'@' | b'/' | b'\\')
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn expect(&mut self, c: u8, context: &'static str) -> Result<(), Error> {
        match self.peek() {
            Some(found) if found == c => {
                self.pos += 1;
                Ok(())
            }
            Some(found) => Err(Error::unexpected(found as char, self.pos)),
            None => Err(Error::UnexpectedEnd { context }),
        }
    }

    /// Reads a query graph up to the end of input or an unmatched `)`.
    fn pattern(&mut self) -> Result<Pattern, Error> {
        let mut chain = Chain::default();

        while let Some(c) = self.peek() {
            let position = self.pos;
            match c {
                b')' if chain.branches.is_empty() => break,
                b')' => {
                    if let Some((_, bond_pos)) = chain.pending_bond {
                        return Err(Error::DanglingBond { position: bond_pos });
                    }
                    if let Some((atom, _)) = chain.branches.pop() {
                        chain.prev = Some(atom);
                    }
                    self.pos += 1;
                }
                b'(' => {
                    let Some(prev) = chain.prev else {
                        return Err(Error::unexpected('(', position));
                    };
                    chain.branches.push((prev, position));
                    self.pos += 1;
                }
                b'.' => {
                    if let Some((_, bond_pos)) = chain.pending_bond {
                        return Err(Error::DanglingBond { position: bond_pos });
                    }
                    chain.prev = None;
                    self.pos += 1;
                }
                b'0'..=b'9' | b'%' => self.ring_closure(&mut chain)?,
                c if is_bond_primitive(c) || matches!(c, b'!' | b',' | b';' | b'&') => {
                    if chain.prev.is_none() || chain.pending_bond.is_some() {
                        return Err(Error::unexpected(c as char, position));
                    }
                    let expr = self.bond_expr()?;
                    chain.pending_bond = Some((expr, position));
                }
                b'[' => {
                    let atom = self.bracket_atom()?;
                    chain.add_atom(atom)?;
                }
                _ => {
                    let atom = self.bare_atom()?;
                    chain.add_atom(atom)?;
                }
            }
        }

        if let Some((_, position)) = chain.pending_bond {
            return Err(Error::DanglingBond { position });
        }
        if let Some(&(_, position)) = chain.branches.last() {
            return Err(Error::UnbalancedBranch { position });
        }
        if let Some(label) = chain.rings.keys().min() {
            return Err(Error::UnclosedRing { label: *label });
        }
        if chain.atoms.is_empty() {
            return Err(match self.peek() {
                Some(c) => Error::unexpected(c as char, self.pos),
                None => Error::UnexpectedEnd { context: "pattern" },
            });
        }
        Ok(Pattern::new(chain.atoms, chain.bonds))
    }

    fn ring_closure(&mut self, chain: &mut Chain) -> Result<(), Error> {
        let position = self.pos;
        let Some(current) = chain.prev else {
            return Err(Error::unexpected(self.input[position] as char, position));
        };

        let label = if self.input[position] == b'%' {
            let (Some(d1), Some(d2)) = (self.peek_at(1), self.peek_at(2)) else {
                return Err(Error::UnexpectedEnd {
                    context: "ring bond label",
                });
            };
            if !d1.is_ascii_digit() || !d2.is_ascii_digit() {
                return Err(Error::unexpected('%', position));
            }
            self.pos += 3;
            ((d1 - b'0') * 10 + (d2 - b'0')) as u16
        } else {
            self.pos += 1;
            (self.input[position] - b'0') as u16
        };

        let written = chain.pending_bond.take().map(|(expr, _)| expr);
        match chain.rings.remove(&label) {
            None => {
                chain.rings.insert(label, (current, written));
            }
            Some((open, _)) if open == current => {
                return Err(Error::unexpected(self.input[position] as char, position));
            }
            Some((open, open_bond)) => {
                let expr = open_bond
                    .or(written)
                    .unwrap_or(BondExpr::Primitive(BondPrimitive::Implicit));
                chain.bonds.push(QueryBond {
                    i: open,
                    j: current,
                    expr,
                });
            }
        }
        Ok(())
    }

    fn bond_expr(&mut self) -> Result<BondExpr, Error> {
        let mut terms = vec![self.bond_disjunction()?];
        while self.peek() == Some(b';') {
            self.pos += 1;
            terms.push(self.bond_disjunction()?);
        }
        Ok(bond_and(terms))
    }

    fn bond_disjunction(&mut self) -> Result<BondExpr, Error> {
        let mut terms = vec![self.bond_conjunction()?];
        while self.peek() == Some(b',') {
            self.pos += 1;
            terms.push(self.bond_conjunction()?);
        }
        Ok(bond_or(terms))
    }

    fn bond_conjunction(&mut self) -> Result<BondExpr, Error> {
        let mut terms = vec![self.bond_unary()?];
        loop {
            match self.peek() {
                Some(b'&') => {
                    self.pos += 1;
                    terms.push(self.bond_unary()?);
                }
                Some(c) if is_bond_primitive(c) || c == b'!' => terms.push(self.bond_unary()?),
                _ => break,
            }
        }
        Ok(bond_and(terms))
    }

    fn bond_unary(&mut self) -> Result<BondExpr, Error> {
        let position = self.pos;
        let primitive = match self.peek() {
            Some(b'!') => {
                self.pos += 1;
                return Ok(BondExpr::Not(Box::new(self.bond_unary()?)));
            }
            Some(b'-' | b'/' | b'\\') => BondPrimitive::Single,
            Some(b'=') => BondPrimitive::Double,
            Some(b'#') => BondPrimitive::Triple,
            Some(b':') => BondPrimitive::Aromatic,
            Some(b'~') => BondPrimitive::Any,
            Some(b'@') => BondPrimitive::Ring,
            Some(c) => return Err(Error::unexpected(c as char, position)),
            None => return Err(Error::UnexpectedEnd { context: "bond" }),
        };
        self.pos += 1;
        Ok(BondExpr::Primitive(primitive))
    }

    /// An atom written outside brackets.
    fn bare_atom(&mut self) -> Result<AtomExpr, Error> {
        let position = self.pos;
        let c = self.input[position];
        let next = self.peek_at(1);
        let (primitive, width) = match c {
            b'*' => (AtomPrimitive::Any, 1),
            b'a' => (AtomPrimitive::Aromatic, 1),
            b'A' => (AtomPrimitive::Aliphatic, 1),
            b'B' if next == Some(b'r') => (aliphatic(Element::BR), 2),
            b'C' if next == Some(b'l') => (aliphatic(Element::CL), 2),
            b'B' => (aliphatic(Element::B), 1),
            b'C' => (aliphatic(Element::C), 1),
            b'N' => (aliphatic(Element::N), 1),
            b'O' => (aliphatic(Element::O), 1),
            b'P' => (aliphatic(Element::P), 1),
            b'S' => (aliphatic(Element::S), 1),
            b'F' => (aliphatic(Element::F), 1),
            b'I' => (aliphatic(Element::I), 1),
            b'b' => (aromatic(Element::B), 1),
            b'c' => (aromatic(Element::C), 1),
            b'n' => (aromatic(Element::N), 1),
            b'o' => (aromatic(Element::O), 1),
            b'p' => (aromatic(Element::P), 1),
            b's' => (aromatic(Element::S), 1),
            _ => return Err(Error::unexpected(c as char, position)),
        };
        self.pos += width;
        Ok(AtomExpr::Primitive(primitive))
    }

    fn bracket_atom(&mut self) -> Result<AtomExpr, Error> {
        self.pos += 1;

        let isotope = self.read_number().map(|n| {
            AtomExpr::Primitive(AtomPrimitive::Isotope(u16::try_from(n).unwrap_or(u16::MAX)))
        });

        // A lone `H`, optionally charged, is a hydrogen atom rather than a
        // hydrogen count.
        let is_hydrogen_atom = self.peek() == Some(b'H')
            && matches!(self.peek_at(1), Some(b']' | b'+' | b'-'));
        let expr = if is_hydrogen_atom {
            self.pos += 1;
            let hydrogen = AtomExpr::Primitive(aliphatic(Element::H));
            if self.peek() == Some(b']') {
                hydrogen
            } else {
                and(vec![hydrogen, self.atom_expr()?])
            }
        } else {
            self.atom_expr()?
        };
        self.expect(b']', "bracket atom")?;

        Ok(match isotope {
            Some(isotope) => and(vec![isotope, expr]),
            None => expr,
        })
    }

    /// Lowest precedence: `;`.
    fn atom_expr(&mut self) -> Result<AtomExpr, Error> {
        let mut terms = vec![self.atom_disjunction()?];
        while self.peek() == Some(b';') {
            self.pos += 1;
            terms.push(self.atom_disjunction()?);
        }
        Ok(and(terms))
    }

    fn atom_disjunction(&mut self) -> Result<AtomExpr, Error> {
        let mut terms = vec![self.atom_conjunction()?];
        while self.peek() == Some(b',') {
            self.pos += 1;
            terms.push(self.atom_conjunction()?);
        }
        Ok(or(terms))
    }

    /// Highest precedence: `&` and juxtaposition.
    fn atom_conjunction(&mut self) -> Result<AtomExpr, Error> {
        let mut terms = vec![self.atom_unary()?];
        loop {
            match self.peek() {
                Some(b'&') => {
                    self.pos += 1;
                    terms.push(self.atom_unary()?);
                }
                Some(b']' | b';' | b',') | None => break,
                Some(_) => terms.push(self.atom_unary()?),
            }
        }
        Ok(and(terms))
    }

    fn atom_unary(&mut self) -> Result<AtomExpr, Error> {
        if self.peek() == Some(b'!') {
            self.pos += 1;
            return Ok(AtomExpr::Not(Box::new(self.atom_unary()?)));
        }
        Ok(AtomExpr::Primitive(self.atom_primitive()?))
    }

    fn atom_primitive(&mut self) -> Result<AtomPrimitive, Error> {
        let position = self.pos;
        let Some(c) = self.peek() else {
            return Err(Error::UnexpectedEnd {
                context: "bracket atom",
            });
        };

        if c.is_ascii_uppercase() {
            if let Some(element) = self.two_letter_element() {
                self.pos += 2;
                return Ok(aliphatic(element));
            }
        }

        self.pos += 1;
        let primitive = match c {
            b'*' => AtomPrimitive::Any,
            b'#' => match self.read_number() {
                Some(z) => AtomPrimitive::AtomicNumber(u8::try_from(z).unwrap_or(u8::MAX)),
                None => return Err(self.unexpected_here("atomic number")),
            },
            b'$' => {
                self.expect(b'(', "recursive SMARTS")?;
                let inner = self.pattern()?;
                self.expect(b')', "recursive SMARTS")?;
                AtomPrimitive::Recursive(Box::new(inner))
            }
            b'H' => AtomPrimitive::TotalHydrogens(self.count_or_one()),
            b'D' => AtomPrimitive::Degree(self.count_or_one()),
            b'X' => AtomPrimitive::Connectivity(self.count_or_one()),
            b'v' => AtomPrimitive::Valence(self.count_or_one()),
            b'R' => AtomPrimitive::RingCount(self.optional_count()),
            b'r' => AtomPrimitive::RingSize(self.optional_count()),
            b'+' | b'-' => AtomPrimitive::Charge(self.charge(c)?),
            b'a' if self.peek() == Some(b's') => {
                self.pos += 1;
                aromatic(Element::AS)
            }
            b's' if self.peek() == Some(b'e') => {
                self.pos += 1;
                aromatic(Element::SE)
            }
            b'a' => AtomPrimitive::Aromatic,
            b'A' => AtomPrimitive::Aliphatic,
            b'b' => aromatic(Element::B),
            b'c' => aromatic(Element::C),
            b'n' => aromatic(Element::N),
            b'o' => aromatic(Element::O),
            b'p' => aromatic(Element::P),
            b's' => aromatic(Element::S),
            c if c.is_ascii_uppercase() => {
                let symbol = (c as char).to_string();
                match symbol.parse::<Element>() {
                    Ok(element) => aliphatic(element),
                    Err(_) => return Err(Error::UnknownElement { symbol, position }),
                }
            }
            _ => return Err(Error::unexpected(c as char, position)),
        };
        Ok(primitive)
    }

    fn two_letter_element(&self) -> Option<Element> {
        let second = self.peek_at(1).filter(u8::is_ascii_lowercase)?;
        let symbol = [self.input[self.pos], second];
        std::str::from_utf8(&symbol).ok()?.parse().ok()
    }

    fn charge(&mut self, sign_symbol: u8) -> Result<i8, Error> {
        let position = self.pos - 1;
        let sign: i32 = if sign_symbol == b'+' { 1 } else { -1 };
        let magnitude = match self.read_number() {
            Some(n) => i32::try_from(n).map_err(|_| Error::unexpected(sign_symbol as char, position))?,
            None => {
                let mut count = 1;
                while self.peek() == Some(sign_symbol) {
                    self.pos += 1;
                    count += 1;
                }
                count
            }
        };
        i8::try_from(sign * magnitude).map_err(|_| Error::unexpected(sign_symbol as char, position))
    }

    fn count_or_one(&mut self) -> u8 {
        self.optional_count().unwrap_or(1)
    }

    fn optional_count(&mut self) -> Option<u8> {
        self.read_number().map(|n| u8::try_from(n).unwrap_or(u8::MAX))
    }

    fn read_number(&mut self) -> Option<u32> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        std::str::from_utf8(&self.input[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .or(Some(u32::MAX))
    }

    fn unexpected_here(&self, context: &'static str) -> Error {
        match self.peek() {
            Some(c) => Error::unexpected(c as char, self.pos),
            None => Error::UnexpectedEnd { context },
        }
    }
}

impl Chain {
    fn add_atom(&mut self, atom: AtomExpr) -> Result<(), Error> {
        let idx = self.atoms.len();
        self.atoms.push(atom);
        match self.prev {
            Some(prev) => {
                let expr = match self.pending_bond.take() {
                    Some((expr, _)) => expr,
                    None => BondExpr::Primitive(BondPrimitive::Implicit),
                };
                self.bonds.push(QueryBond { i: prev, j: idx, expr });
            }
            None => {
                if let Some((_, position)) = self.pending_bond {
                    return Err(Error::DanglingBond { position });
                }
            }
        }
        self.prev = Some(idx);
        Ok(())
    }
}

fn aliphatic(element: Element) -> AtomPrimitive {
    AtomPrimitive::Element {
        element,
        aromatic: false,
    }
}

fn aromatic(element: Element) -> AtomPrimitive {
    AtomPrimitive::Element {
        element,
        aromatic: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primitive(p: AtomPrimitive) -> AtomExpr {
        AtomExpr::Primitive(p)
    }

    #[test]
    fn chain_with_branch_and_bond_symbols() {
        let pattern = parse_smarts("C(=O)N[OH]").unwrap();
        assert_eq!(pattern.atom_count(), 4);
        assert_eq!(pattern.bond_count(), 3);
        assert_eq!(pattern.bonds[0].expr, BondExpr::Primitive(BondPrimitive::Double));
        assert_eq!((pattern.bonds[1].i, pattern.bonds[1].j), (0, 2));
        assert_eq!(pattern.bonds[1].expr, BondExpr::Primitive(BondPrimitive::Implicit));
        assert_eq!(
            pattern.atoms[3],
            AtomExpr::And(vec![
                primitive(aliphatic(Element::O)),
                primitive(AtomPrimitive::TotalHydrogens(1)),
            ])
        );
    }

    #[test]
    fn operator_precedence() {
        let pattern = parse_smarts("[C,N;R2&!a]").unwrap();
        assert_eq!(
            pattern.atoms[0],
            AtomExpr::And(vec![
                AtomExpr::Or(vec![
                    primitive(aliphatic(Element::C)),
                    primitive(aliphatic(Element::N)),
                ]),
                AtomExpr::And(vec![
                    primitive(AtomPrimitive::RingCount(Some(2))),
                    AtomExpr::Not(Box::new(primitive(AtomPrimitive::Aromatic))),
                ]),
            ])
        );
    }

    #[test]
    fn two_letter_symbols_win_over_primitives() {
        let pattern = parse_smarts("[Hg,Ho,Cl,Nb,se,Nv3]").unwrap();
        let AtomExpr::Or(terms) = &pattern.atoms[0] else {
            panic!("expected a disjunction");
        };
        assert_eq!(terms[0], primitive(aliphatic("Hg".parse().unwrap())));
        assert_eq!(terms[1], primitive(aliphatic("Ho".parse().unwrap())));
        assert_eq!(terms[2], primitive(aliphatic(Element::CL)));
        assert_eq!(terms[3], primitive(aliphatic("Nb".parse().unwrap())));
        assert_eq!(terms[4], primitive(aromatic(Element::SE)));
        assert_eq!(
            terms[5],
            AtomExpr::And(vec![
                primitive(aliphatic(Element::N)),
                primitive(AtomPrimitive::Valence(3)),
            ])
        );
    }

    #[test]
    fn charges_and_isotopes() {
        let pattern = parse_smarts("[O-;X1].[N+0].[13C].[S--]").unwrap();
        assert_eq!(pattern.atom_count(), 4);
        assert_eq!(pattern.bond_count(), 0);
        assert_eq!(
            pattern.atoms[1],
            AtomExpr::And(vec![
                primitive(aliphatic(Element::N)),
                primitive(AtomPrimitive::Charge(0)),
            ])
        );
        assert_eq!(
            pattern.atoms[2],
            AtomExpr::And(vec![
                primitive(AtomPrimitive::Isotope(13)),
                primitive(aliphatic(Element::C)),
            ])
        );
        assert_eq!(
            pattern.atoms[3],
            AtomExpr::And(vec![
                primitive(aliphatic(Element::S)),
                primitive(AtomPrimitive::Charge(-2)),
            ])
        );
    }

    #[test]
    fn recursive_environments_nest() {
        let pattern = parse_smarts("[$([A;R][!a])]").unwrap();
        let AtomExpr::Primitive(AtomPrimitive::Recursive(inner)) = &pattern.atoms[0] else {
            panic!("expected a recursive primitive");
        };
        assert_eq!(inner.atom_count(), 2);
        assert_eq!(inner.bond_count(), 1);

        let pattern = parse_smarts("[$([N;+0;X3;v3]);!$(N[C,S]=O)]").unwrap();
        assert_eq!(pattern.atom_count(), 1);
    }

    #[test]
    fn ring_closures_after_branches_and_two_digit_runs() {
        let pattern = parse_smarts("C1NC(=O)NC(=O)1").unwrap();
        assert_eq!(pattern.atom_count(), 7);
        assert_eq!(pattern.bond_count(), 7);
        assert_eq!((pattern.bonds[6].i, pattern.bonds[6].j), (0, 5));

        let pattern = parse_smarts("C12C(NC(N1)=O)CSC2").unwrap();
        assert_eq!(pattern.atom_count(), 9);
        assert_eq!(pattern.bond_count(), 10);
        assert_eq!((pattern.bonds[4].i, pattern.bonds[4].j), (0, 4));
        assert_eq!((pattern.bonds[9].i, pattern.bonds[9].j), (0, 8));
    }

    #[test]
    fn bond_expressions() {
        let pattern = parse_smarts("C=!@CC~[#7]").unwrap();
        assert_eq!(
            pattern.bonds[0].expr,
            BondExpr::And(vec![
                BondExpr::Primitive(BondPrimitive::Double),
                BondExpr::Not(Box::new(BondExpr::Primitive(BondPrimitive::Ring))),
            ])
        );
        assert_eq!(pattern.bonds[2].expr, BondExpr::Primitive(BondPrimitive::Any));
        assert_eq!(pattern.atoms[3], primitive(AtomPrimitive::AtomicNumber(7)));
    }

    #[test]
    fn malformed_patterns_are_rejected() {
        assert!(matches!(parse_smarts("[C"), Err(Error::UnexpectedEnd { .. })));
        assert!(matches!(parse_smarts("C1CC"), Err(Error::UnclosedRing { label: 1 })));
        assert!(matches!(parse_smarts("C(C"), Err(Error::UnbalancedBranch { position: 1 })));
        assert!(matches!(parse_smarts("CC="), Err(Error::DanglingBond { .. })));
        assert!(matches!(parse_smarts("C)"), Err(Error::UnexpectedCharacter { ch: ')', .. })));
        assert!(matches!(parse_smarts("[Qq]"), Err(Error::UnknownElement { .. })));
        assert!(matches!(parse_smarts(""), Err(Error::UnexpectedEnd { .. })));
    }
}
