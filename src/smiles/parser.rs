use std::collections::HashMap;

use super::error::Error;
use crate::model::atom::Atom;
use crate::model::molecule::{Bond, Molecule};
use crate::model::types::{BondOrder, Element};

struct OpenRing {
    atom: usize,
    order: Option<BondOrder>,
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    prev: Option<usize>,
    pending_bond: Option<(BondOrder, usize)>,
    branches: Vec<(usize, usize)>,
    rings: HashMap<u16, OpenRing>,
}

/// Reads the graph of a SMILES string without any chemical validation.
///
/// Bracket atoms carry their written hydrogen count; organic-subset atoms
/// have zero hydrogens until sanitization assigns implicit ones.
pub fn parse_graph(smiles: &str) -> Result<Molecule, Error> {
    let mut parser = Parser {
        input: smiles.as_bytes(),
        pos: 0,
        atoms: Vec::new(),
        bonds: Vec::new(),
        prev: None,
        pending_bond: None,
        branches: Vec::new(),
        rings: HashMap::new(),
    };
    parser.run()?;
    Ok(Molecule::new(parser.atoms, parser.bonds))
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn run(&mut self) -> Result<(), Error> {
        while let Some(c) = self.peek() {
            let position = self.pos;
            match c {
                b'(' => self.open_branch(position)?,
                b')' => self.close_branch(position)?,
                b'-' | b'=' | b'#' | b'$' | b':' | b'/' | b'\\' => self.bond_symbol(c, position)?,
                b'.' => {
                    if self.pending_bond.is_some() {
                        return Err(Error::DanglingBond { position });
                    }
                    self.prev = None;
                    self.pos += 1;
                }
                b'0'..=b'9' | b'%' => self.ring_closure(position)?,
                b'[' => {
                    let atom = self.bracket_atom()?;
                    self.add_atom(atom)?;
                }
                _ => {
                    let atom = self.organic_atom()?;
                    self.add_atom(atom)?;
                }
            }
        }

        if let Some((_, position)) = self.pending_bond {
            return Err(Error::DanglingBond { position });
        }
        if let Some(&(_, position)) = self.branches.last() {
            return Err(Error::UnbalancedBranch { position });
        }
        if let Some(label) = self.rings.keys().min() {
            return Err(Error::UnclosedRing { label: *label });
        }
        Ok(())
    }

    fn open_branch(&mut self, position: usize) -> Result<(), Error> {
        let Some(prev) = self.prev else {
            return Err(Error::MissingAtom { ch: '(', position });
        };
        if self.pending_bond.is_some() {
            return Err(Error::unexpected('(', position));
        }
        if self.peek_at(1) == Some(b')') {
            return Err(Error::unexpected(')', position + 1));
        }
        self.branches.push((prev, position));
        self.pos += 1;
        Ok(())
    }

    fn close_branch(&mut self, position: usize) -> Result<(), Error> {
        if let Some((_, bond_pos)) = self.pending_bond {
            return Err(Error::DanglingBond { position: bond_pos });
        }
        let Some((atom, _)) = self.branches.pop() else {
            return Err(Error::UnbalancedBranch { position });
        };
        self.prev = Some(atom);
        self.pos += 1;
        Ok(())
    }

    fn bond_symbol(&mut self, c: u8, position: usize) -> Result<(), Error> {
        if self.prev.is_none() {
            return Err(Error::MissingAtom {
                ch: c as char,
                position,
            });
        }
        if self.pending_bond.is_some() {
            return Err(Error::unexpected(c as char, position));
        }
        let order = match c {
            b'=' => BondOrder::Double,
            b'#' => BondOrder::Triple,
            b'$' => BondOrder::Quadruple,
            b':' => BondOrder::Aromatic,
            _ => BondOrder::Single,
        };
        self.pending_bond = Some((order, position));
        self.pos += 1;
        Ok(())
    }

    fn ring_closure(&mut self, position: usize) -> Result<(), Error> {
        let Some(current) = self.prev else {
            return Err(Error::MissingAtom {
                ch: self.input[position] as char,
                position,
            });
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

        let written = self.pending_bond.take().map(|(order, _)| order);

        match self.rings.remove(&label) {
            None => {
                self.rings.insert(
                    label,
                    OpenRing {
                        atom: current,
                        order: written,
                    },
                );
            }
            Some(open) => {
                if open.atom == current {
                    return Err(Error::ring_bond(label, position, "atom bonded to itself"));
                }
                if self.has_bond(open.atom, current) {
                    return Err(Error::ring_bond(label, position, "duplicate bond"));
                }
                let order = match (open.order, written) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(Error::ring_bond(label, position, "conflicting bond orders"));
                    }
                    (Some(order), _) | (None, Some(order)) => order,
                    (None, None) => self.default_order(open.atom, current),
                };
                self.bonds.push(Bond::new(open.atom, current, order));
            }
        }
        Ok(())
    }

    fn has_bond(&self, a: usize, b: usize) -> bool {
        self.bonds
            .iter()
            .any(|bond| (bond.i == a && bond.j == b) || (bond.i == b && bond.j == a))
    }

    fn default_order(&self, a: usize, b: usize) -> BondOrder {
        if self.atoms[a].aromatic && self.atoms[b].aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn add_atom(&mut self, atom: Atom) -> Result<(), Error> {
        let idx = self.atoms.len();
        self.atoms.push(atom);
        match self.prev {
            Some(prev) => {
                let order = match self.pending_bond.take() {
                    Some((order, _)) => order,
                    None => self.default_order(prev, idx),
                };
                self.bonds.push(Bond::new(prev, idx, order));
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

    fn organic_atom(&mut self) -> Result<Atom, Error> {
        let position = self.pos;
        let c = self.input[position];
        let next = self.peek_at(1);
        let (atom, width) = match c {
            b'B' if next == Some(b'r') => (Atom::new(Element::BR), 2),
            b'C' if next == Some(b'l') => (Atom::new(Element::CL), 2),
            b'B' => (Atom::new(Element::B), 1),
            b'C' => (Atom::new(Element::C), 1),
            b'N' => (Atom::new(Element::N), 1),
            b'O' => (Atom::new(Element::O), 1),
            b'P' => (Atom::new(Element::P), 1),
            b'S' => (Atom::new(Element::S), 1),
            b'F' => (Atom::new(Element::F), 1),
            b'I' => (Atom::new(Element::I), 1),
            b'*' => (Atom::new(Element::DUMMY), 1),
            b'b' => (Atom::aromatic(Element::B), 1),
            b'c' => (Atom::aromatic(Element::C), 1),
            b'n' => (Atom::aromatic(Element::N), 1),
            b'o' => (Atom::aromatic(Element::O), 1),
            b'p' => (Atom::aromatic(Element::P), 1),
            b's' => (Atom::aromatic(Element::S), 1),
            _ => return Err(Error::unexpected(self.char_at(position), position)),
        };
        self.pos += width;
        Ok(atom)
    }

    fn char_at(&self, position: usize) -> char {
        std::str::from_utf8(&self.input[position..])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(self.input[position] as char)
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
    }

    fn bracket_atom(&mut self) -> Result<Atom, Error> {
        self.pos += 1;

        let isotope = self.read_number().map(|n| n.min(u16::MAX as u32) as u16);
        let mut atom = self.bracket_symbol()?;
        atom.isotope = isotope;
        atom.bracket = true;

        self.skip_chirality();

        if self.peek() == Some(b'H') {
            self.pos += 1;
            atom.hydrogens = self.read_number().unwrap_or(1).min(u8::MAX as u32) as u8;
        }

        atom.charge = self.bracket_charge()?;

        if self.peek() == Some(b':') {
            self.pos += 1;
            if self.read_number().is_none() {
                return match self.peek() {
                    Some(c) => Err(Error::unexpected(c as char, self.pos)),
                    None => Err(Error::UnexpectedEnd {
                        context: "bracket atom",
                    }),
                };
            }
        }

        match self.peek() {
            Some(b']') => {
                self.pos += 1;
                Ok(atom)
            }
            Some(_) => Err(Error::unexpected(self.char_at(self.pos), self.pos)),
            None => Err(Error::UnexpectedEnd {
                context: "bracket atom",
            }),
        }
    }

    fn bracket_symbol(&mut self) -> Result<Atom, Error> {
        let position = self.pos;
        let Some(first) = self.peek() else {
            return Err(Error::UnexpectedEnd {
                context: "bracket atom",
            });
        };

        if first == b'*' {
            self.pos += 1;
            return Ok(Atom::new(Element::DUMMY));
        }

        if first.is_ascii_lowercase() {
            let two = self.peek_at(1).filter(u8::is_ascii_lowercase);
            let aromatic = match (first, two) {
                (b's', Some(b'e')) => Some((Element::SE, 2)),
                (b'a', Some(b's')) => Some((Element::AS, 2)),
                (b't', Some(b'e')) => Some((Element::TE, 2)),
                (b'b', _) => Some((Element::B, 1)),
                (b'c', _) => Some((Element::C, 1)),
                (b'n', _) => Some((Element::N, 1)),
                (b'o', _) => Some((Element::O, 1)),
                (b'p', _) => Some((Element::P, 1)),
                (b's', _) => Some((Element::S, 1)),
                _ => None,
            };
            return match aromatic {
                Some((element, width)) => {
                    self.pos += width;
                    Ok(Atom::aromatic(element))
                }
                None => Err(Error::UnknownElement {
                    symbol: self.char_at(position).to_string(),
                    position,
                }),
            };
        }

        if !first.is_ascii_uppercase() {
            return Err(Error::unexpected(self.char_at(position), position));
        }

        if let Some(second) = self.peek_at(1).filter(u8::is_ascii_lowercase) {
            let symbol = [first, second];
            if let Some(element) = std::str::from_utf8(&symbol)
                .ok()
                .and_then(|s| s.parse::<Element>().ok())
            {
                self.pos += 2;
                return Ok(Atom::new(element));
            }
        }

        let symbol = (first as char).to_string();
        match symbol.parse::<Element>() {
            Ok(element) => {
                self.pos += 1;
                Ok(Atom::new(element))
            }
            Err(_) => Err(Error::UnknownElement { symbol, position }),
        }
    }

    fn skip_chirality(&mut self) {
        if self.peek() != Some(b'@') {
            return;
        }
        self.pos += 1;
        if self.peek() == Some(b'@') {
            self.pos += 1;
            return;
        }
        let is_class = self
            .input
            .get(self.pos..self.pos + 2)
            .is_some_and(|s| matches!(s, b"TH" | b"AL" | b"SP" | b"TB" | b"OH"));
        if is_class {
            self.pos += 2;
            self.read_number();
        }
    }

    fn bracket_charge(&mut self) -> Result<i8, Error> {
        let sign: i32 = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Ok(0),
        };
        let symbol = self.input[self.pos];
        self.pos += 1;

        let digits = self.pos;
        let overflow = || Error::unexpected(symbol as char, digits - 1);
        let magnitude = match self.read_number() {
            Some(n) => i32::try_from(n).map_err(|_| overflow())?,
            None if self.pos > digits => return Err(overflow()),
            None => {
                let mut count = 1;
                while self.peek() == Some(symbol) {
                    self.pos += 1;
                    count += 1;
                }
                count
            }
        };

        i8::try_from(sign * magnitude).map_err(|_| overflow())
    }
}
