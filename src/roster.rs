use std::collections::HashSet;

/// Roster shipped with the application, matching the class list the
/// exported attendance documents are written against.
pub const DEFAULT_ROSTER: &[&str] = &[
    "Achille De Vriese",
    "Alexander Dubois",
    "Amélie Niesten",
    "Amélie Van den Heuvel",
    "Annemerel Bobbaers",
    "Bram Verbelen",
    "Brent De Peuter",
    "Charles De Beir",
    "Charlotte Severyns",
    "Diete Wouters",
    "Driek Rediers",
    "Dries Vandevoort",
    "Elize Bonten",
    "Emily Denys",
    "Emma Jans",
    "Fien Servranckx",
    "Gilles Sempels",
    "Henri Mesman",
    "Hugo Van Nuffel",
    "Ian Mertens",
    "Jakob De Meyere",
    "Jarne Plessers",
    "Jef De Koker",
    "Jinne Nijs",
    "Jules Legrand",
    "Jussi Gysemans",
    "Kato Loeckx",
    "Kenny Nwosu",
    "Kwinten Lowie",
    "Lander De Veuster",
    "Lander Verhoeven",
    "Lars Lagauw",
    "Lien Merckx",
    "Lisa Corten",
    "Lore Bellen",
    "Lucas Fonderie",
    "Lucas Renard",
    "Lucy Vande Sande",
    "Maarten Haine",
    "Marian Van Alphen",
    "Marie Lampaert",
    "Marie-Johanna Schillemans",
    "Marte Maes",
    "Martijn Berger",
    "Matthias Van Strydonck",
    "Matthijs De Haeck",
    "Matti Boelen",
    "Mattias Duysters",
    "Mauro Van Tichelen",
    "Michiel Huysmans",
    "Milo Van Aelst",
    "Nando De Rijck",
    "Nando Quishpe",
    "Noah Steinier",
    "Oscar Peersman",
    "Patryk Borzym",
    "Phelps van den Bosch",
    "Pierre Harmant",
    "Pierre Stavart",
    "Quinten Van de Reyde",
    "Rémi Mentens",
    "Robbe Mensch",
    "Robbe Serry",
    "Robbe Van Royen",
    "Robin De Becker",
    "Robin Van Looveren",
    "Ruben De Block",
    "Sander Deroover",
    "Sepp Swinnen",
    "Seppe Van der Biest",
    "Seppe Van Gelder",
    "Thiago Thielemans",
    "Thomas Billiet",
    "Tiddo Nees",
    "Tiemen Moeyersons",
    "Timon Dries",
    "Tobias De Clercq",
    "Tom Moermans",
    "Victor Moeys",
    "Viktor Meekers",
    "Vincent Ramharter",
    "Wannes Huygh",
    "Willem Bormans",
    "Wout Raspoet",
    "Xander Depauw",
    "Yana Possemiers",
    "Yannick Pâquet",
];

/// The set of full names accepted as genuine attendance records.
///
/// Membership is exact and case-sensitive. Candidate text is trimmed before
/// the lookup, so `"  Bram Verbelen "` matches but `"bram verbelen"` does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownNames {
    names: HashSet<String>,
}

impl KnownNames {
    /// Builds a roster from arbitrary data. Entries are trimmed and blank
    /// entries dropped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        KnownNames { names }
    }

    pub fn contains(&self, text: &str) -> bool {
        self.names.contains(text.trim())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for KnownNames {
    fn default() -> Self {
        Self::from_names(DEFAULT_ROSTER.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roster_is_complete() {
        let roster = KnownNames::default();
        assert_eq!(roster.len(), DEFAULT_ROSTER.len());
        assert_eq!(roster.len(), 87);
        assert!(roster.contains("Bram Verbelen"));
        assert!(roster.contains("Yannick Pâquet"));
    }

    #[test]
    fn membership_is_exact_after_trimming() {
        let roster = KnownNames::default();
        assert!(roster.contains("  Lisa Corten\n"));
        assert!(!roster.contains("lisa corten"));
        assert!(!roster.contains("Lisa"));
        assert!(!roster.contains("Lisa  Corten"));
    }

    #[test]
    fn custom_roster_drops_blank_entries() {
        let roster = KnownNames::from_names(["Ada Lovelace", "  ", "", " Alan Turing "]);
        assert_eq!(roster.len(), 2);
        assert!(roster.contains("Alan Turing"));
        assert!(!roster.contains("Bram Verbelen"));
    }
}
