use std::fmt;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TallyError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    pub term: String,
    pub definition: String,
}

/// Flashcards in insertion order, unique by exact term. Stored on disk as a
/// JSON object mapping term to definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Flashcard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizMode {
    /// Show the term, guess the definition.
    TermFirst,
    /// Show the definition, guess the term.
    DefinitionFirst,
}

impl QuizMode {
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(Self::TermFirst),
            "2" => Some(Self::DefinitionFirst),
            _ => None,
        }
    }

    /// (shown side, expected answer)
    pub fn sides<'a>(&self, card: &'a Flashcard) -> (&'a str, &'a str) {
        match self {
            Self::TermFirst => (card.term.as_str(), card.definition.as_str()),
            Self::DefinitionFirst => (card.definition.as_str(), card.term.as_str()),
        }
    }
}

/// Answers match ignoring case and surrounding whitespace.
pub fn answers_match(given: &str, expected: &str) -> bool {
    given.trim().to_lowercase() == expected.trim().to_lowercase()
}

impl Deck {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flashcard> {
        self.cards.iter()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.cards.iter().any(|c| c.term == term)
    }

    /// Case-insensitive lookup; an exact match wins.
    fn position(&self, term: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.term == term).or_else(|| {
            let lower = term.to_lowercase();
            self.cards.iter().position(|c| c.term.to_lowercase() == lower)
        })
    }

    pub fn add(&mut self, term: &str, definition: &str) -> Result<()> {
        if self.contains(term) {
            return Err(TallyError::DuplicateTerm(term.to_string()));
        }
        self.cards.push(Flashcard {
            term: term.to_string(),
            definition: definition.to_string(),
        });
        Ok(())
    }

    pub fn remove(&mut self, term: &str) -> Option<Flashcard> {
        self.position(term).map(|i| self.cards.remove(i))
    }

    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Flashcard> {
        self.cards.choose(rng)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TallyError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        let deck: Deck = serde_json::from_str(&content)?;
        log::info!("loaded {} flashcards from {}", deck.len(), path.display());
        Ok(deck)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, format!("{json}\n"))?;
        log::info!("saved {} flashcards to {}", self.len(), path.display());
        Ok(())
    }
}

impl Serialize for Deck {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.cards.iter().map(|c| (&c.term, &c.definition)))
    }
}

struct DeckVisitor;

impl<'de> Visitor<'de> for DeckVisitor {
    type Value = Deck;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping terms to definitions")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> std::result::Result<Deck, M::Error> {
        let mut deck = Deck::default();
        while let Some((term, definition)) = access.next_entry::<String, String>()? {
            // Later duplicates overwrite, as a JSON object would.
            match deck.cards.iter_mut().find(|c| c.term == term) {
                Some(card) => card.definition = definition,
                None => deck.cards.push(Flashcard { term, definition }),
            }
        }
        Ok(deck)
    }
}

impl<'de> Deserialize<'de> for Deck {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(DeckVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn deck(pairs: &[(&str, &str)]) -> Deck {
        let mut d = Deck::default();
        for (t, def) in pairs {
            d.add(t, def).unwrap();
        }
        d
    }

    #[test]
    fn test_add_rejects_duplicate_terms() {
        let mut d = deck(&[("Rust", "A language")]);
        assert!(matches!(d.add("Rust", "Oxide"), Err(TallyError::DuplicateTerm(_))));
        d.add("rust", "Lowercase is a different term").unwrap();
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn test_remove_is_case_insensitive() {
        let mut d = deck(&[("Borrow", "A reference"), ("Move", "Transfer ownership")]);
        let removed = d.remove("BORROW").unwrap();
        assert_eq!(removed.term, "Borrow");
        assert_eq!(d.len(), 1);
        assert!(d.remove("nothing").is_none());
    }

    #[test]
    fn test_save_and_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flashcards.json");
        let d = deck(&[("zeta", "last letter"), ("alpha", "first letter"), ("mu", "middle")]);
        d.save(&path).unwrap();
        let loaded = Deck::load(&path).unwrap();
        assert_eq!(loaded, d);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.find("zeta").unwrap() < content.find("alpha").unwrap());
    }

    #[test]
    fn test_load_reads_plain_json_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flashcards.json");
        std::fs::write(&path, r#"{"Trait": "Shared behaviour", "Crate": "Compilation unit"}"#).unwrap();
        let mut d = Deck::load(&path).unwrap();
        let terms: Vec<_> = d.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms, vec!["Trait", "Crate"]);
        assert_eq!(d.remove("crate").unwrap().definition, "Compilation unit");
    }

    #[test]
    fn test_load_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Deck::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(missing.is_not_found());

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(Deck::load(&path), Err(TallyError::Json(_))));
    }

    #[test]
    fn test_answers_match_ignores_case_and_whitespace() {
        assert!(answers_match("  a LANGUAGE ", "A language"));
        assert!(!answers_match("a lang", "A language"));
    }

    #[test]
    fn test_quiz_sides() {
        let card = Flashcard {
            term: "t".to_string(),
            definition: "d".to_string(),
        };
        assert_eq!(QuizMode::TermFirst.sides(&card), ("t", "d"));
        assert_eq!(QuizMode::DefinitionFirst.sides(&card), ("d", "t"));
        assert_eq!(QuizMode::from_choice("3"), None);
    }

    #[test]
    fn test_random_card() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(Deck::default().random(&mut rng).is_none());
        let d = deck(&[("only", "card")]);
        assert_eq!(d.random(&mut rng).unwrap().term, "only");
    }
}
