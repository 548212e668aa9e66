// src/app/genres.rs
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::AppError;

/// Fixed genre table; each entry is bound to one TMDB genre id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Genre {
    Action,
    Drama,
    SciFi,
    Comedy,
    Thriller,
    Horror,
    Romance,
    Crime,
    Adventure,
    Fantasy,
}

static BY_NAME: Lazy<HashMap<String, Genre>> = Lazy::new(|| {
    Genre::ALL
        .iter()
        .map(|g| (g.name().to_ascii_lowercase(), *g))
        .collect()
});

impl Genre {
    /// Display order of the checkboxes.
    pub const ALL: [Self; 10] = [
        Self::Action,
        Self::Drama,
        Self::SciFi,
        Self::Comedy,
        Self::Thriller,
        Self::Horror,
        Self::Romance,
        Self::Crime,
        Self::Adventure,
        Self::Fantasy,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Action => "Action",
            Self::Drama => "Drama",
            Self::SciFi => "Sci-Fi",
            Self::Comedy => "Comedy",
            Self::Thriller => "Thriller",
            Self::Horror => "Horror",
            Self::Romance => "Romance",
            Self::Crime => "Crime",
            Self::Adventure => "Adventure",
            Self::Fantasy => "Fantasy",
        }
    }

    pub const fn provider_id(self) -> u32 {
        match self {
            Self::Action => 28,
            Self::Drama => 18,
            Self::SciFi => 878,
            Self::Comedy => 35,
            Self::Thriller => 53,
            Self::Horror => 27,
            Self::Romance => 10749,
            Self::Crime => 80,
            Self::Adventure => 12,
            Self::Fantasy => 14,
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        BY_NAME.get(&s.trim().to_ascii_lowercase()).copied()
    }
}

/// Insertion-ordered set of toggled genres.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenreSelection {
    selected: Vec<Genre>,
}

impl GenreSelection {
    /// Flip membership; returns whether `genre` is selected afterwards.
    pub fn toggle(&mut self, genre: Genre) -> bool {
        if let Some(pos) = self.selected.iter().position(|g| *g == genre) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(genre);
            true
        }
    }

    pub fn toggle_by_name(&mut self, name: &str) -> Result<bool, AppError> {
        let genre = Genre::from_name(name).ok_or_else(|| AppError::UnknownGenre(name.to_string()))?;
        Ok(self.toggle(genre))
    }

    pub fn contains(&self, genre: Genre) -> bool {
        self.selected.contains(&genre)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// `with_genres` value: ids in selection order, comma separated.
    pub fn joined_ids(&self) -> String {
        self.selected
            .iter()
            .map(|g| g.provider_id().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_closed_and_unique() {
        let mut ids: Vec<u32> = Genre::ALL.iter().map(|g| g.provider_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
        for g in Genre::ALL {
            assert_eq!(Genre::from_name(g.name()), Some(g));
        }
        assert_eq!(Genre::from_name(" sci-fi "), Some(Genre::SciFi));
        assert_eq!(Genre::from_name("Western"), None);
    }

    #[test]
    fn double_toggle_restores_selection() {
        let mut sel = GenreSelection::default();
        sel.toggle(Genre::Drama);
        let before = sel.clone();

        assert!(sel.toggle(Genre::Horror));
        assert!(!sel.toggle(Genre::Horror));
        assert_eq!(sel, before);
    }

    #[test]
    fn joined_ids_follow_selection_order() {
        let mut sel = GenreSelection::default();
        sel.toggle_by_name("Horror").unwrap();
        sel.toggle_by_name("Thriller").unwrap();
        assert_eq!(sel.joined_ids(), "27,53");

        sel.toggle(Genre::Horror);
        sel.toggle(Genre::Horror);
        assert_eq!(sel.joined_ids(), "53,27");
    }

    #[test]
    fn unknown_names_are_rejected() {
        let mut sel = GenreSelection::default();
        assert_eq!(
            sel.toggle_by_name("Musical"),
            Err(AppError::UnknownGenre("Musical".into()))
        );
        assert!(sel.is_empty());
    }
}
