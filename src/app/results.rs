// src/app/results.rs
use super::types::MovieSummary;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayState {
    Loading,
    Empty,
    Movies,
}

/// Movies currently on screen. Only the coordinator replaces them.
#[derive(Debug, Default)]
pub struct ResultSet {
    movies: Vec<MovieSummary>,
    revision: u64,
}

impl ResultSet {
    pub fn movies(&self) -> &[MovieSummary] {
        &self.movies
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Bumped on every replacement, even when the new list is identical.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub fn display_state(&self, loading: bool) -> DisplayState {
        if loading {
            DisplayState::Loading
        } else if self.movies.is_empty() {
            DisplayState::Empty
        } else {
            DisplayState::Movies
        }
    }

    pub(crate) fn replace(&mut self, movies: Vec<MovieSummary>) {
        self.movies = movies;
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("m{id}"),
            poster_path: None,
            vote_average: None,
            release_date: None,
        }
    }

    #[test]
    fn empty_only_when_not_loading() {
        let mut rs = ResultSet::default();
        assert_eq!(rs.display_state(true), DisplayState::Loading);
        assert_eq!(rs.display_state(false), DisplayState::Empty);

        rs.replace(vec![movie(1), movie(2)]);
        assert_eq!(rs.display_state(false), DisplayState::Movies);
        assert_eq!(rs.revision(), 1);
        assert_eq!(rs.movies()[1].title, "m2");
    }
}
