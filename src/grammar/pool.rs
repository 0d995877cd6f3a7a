// Nonterminal identifiers are the uppercase letters, so a grammar can never
// hold more than this many nonterminals, fresh ones included.
pub const ALPHABET_SIZE: usize = 26;

/// Tracks which nonterminal identifiers a grammar has taken and hands out
/// unused ones during normalization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SymbolPool {
    used: [bool; ALPHABET_SIZE],
}

fn slot(symbol: char) -> Option<usize> {
    if symbol.is_ascii_uppercase() {
        Some(symbol as usize - 'A' as usize)
    } else {
        None
    }
}

fn identifier(slot: usize) -> char {
    (b'A' + slot as u8) as char
}

impl SymbolPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `symbol` as taken. Returns false if it is not a valid identifier.
    pub fn reserve(&mut self, symbol: char) -> bool {
        match slot(symbol) {
            Some(i) => {
                self.used[i] = true;
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn is_used(&self, symbol: char) -> bool {
        slot(symbol).is_some_and(|i| self.used[i])
    }

    /// Takes the lowest identifier nobody uses yet, or `None` once all of
    /// them are gone.
    pub fn fresh(&mut self) -> Option<char> {
        let free = self.used.iter().position(|used| !used)?;
        self.used[free] = true;
        Some(identifier(free))
    }

    pub fn remaining(&self) -> usize {
        self.used.iter().filter(|used| !**used).count()
    }
}
