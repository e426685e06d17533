//! Static region table.
//!
//! Regions partition the national dex by generation. The table is ordered
//! by generation and ranges never overlap.

use serde::Serialize;

/// A game region and the inclusive id range it introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    /// Stable identifier, e.g. `kanto`.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// First dex number in the region.
    pub start_id: u32,
    /// Last dex number in the region (inclusive).
    pub end_id: u32,
    /// Generation that introduced the region.
    pub generation: u8,
    /// One-line description.
    pub description: &'static str,
}

impl Region {
    /// Number of records in the region.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.end_id - self.start_id + 1
    }

    /// Zero-based list offset of the region's first record.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.start_id - 1
    }

    /// Whether `id` falls inside the region.
    #[must_use]
    pub const fn contains(&self, id: u32) -> bool {
        id >= self.start_id && id <= self.end_id
    }
}

/// All regions, in generation order.
pub const REGIONS: [Region; 9] = [
    Region {
        id: "kanto",
        name: "Kanto",
        start_id: 1,
        end_id: 151,
        generation: 1,
        description: "The original region where it all began",
    },
    Region {
        id: "johto",
        name: "Johto",
        start_id: 152,
        end_id: 251,
        generation: 2,
        description: "Land of tradition and legendary beasts",
    },
    Region {
        id: "hoenn",
        name: "Hoenn",
        start_id: 252,
        end_id: 386,
        generation: 3,
        description: "A region of land and sea",
    },
    Region {
        id: "sinnoh",
        name: "Sinnoh",
        start_id: 387,
        end_id: 493,
        generation: 4,
        description: "The land of myths and legends",
    },
    Region {
        id: "unova",
        name: "Unova",
        start_id: 494,
        end_id: 649,
        generation: 5,
        description: "A region far from others",
    },
    Region {
        id: "kalos",
        name: "Kalos",
        start_id: 650,
        end_id: 721,
        generation: 6,
        description: "The region of beauty and art",
    },
    Region {
        id: "alola",
        name: "Alola",
        start_id: 722,
        end_id: 809,
        generation: 7,
        description: "Tropical islands with unique forms",
    },
    Region {
        id: "galar",
        name: "Galar",
        start_id: 810,
        end_id: 898,
        generation: 8,
        description: "Industrial region with Dynamax",
    },
    Region {
        id: "paldea",
        name: "Paldea",
        start_id: 899,
        end_id: 1025,
        generation: 9,
        description: "Open world of adventure",
    },
];

/// Finds the region containing a dex number. Ids below 1 match nothing.
#[must_use]
pub fn get_region_by_pokemon_id(id: i64) -> Option<&'static Region> {
    let id = u32::try_from(id).ok()?;
    REGIONS.iter().find(|region| region.contains(id))
}

/// Finds a region by its identifier (case-insensitive).
#[must_use]
pub fn get_region_by_id(region_id: &str) -> Option<&'static Region> {
    REGIONS
        .iter()
        .find(|region| region.id.eq_ignore_ascii_case(region_id.trim()))
}

/// Number of records in a region, or 0 for an unknown id.
#[must_use]
pub fn region_pokemon_count(region_id: &str) -> u32 {
    get_region_by_id(region_id).map_or(0, Region::count)
}

/// Zero-based list offset of a region, or 0 for an unknown id.
#[must_use]
pub fn region_offset(region_id: &str) -> u32 {
    get_region_by_id(region_id).map_or(0, Region::offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_regions_strictly_increasing() {
        for pair in REGIONS.windows(2) {
            assert!(pair[0].generation < pair[1].generation);
            assert!(
                pair[0].end_id < pair[1].start_id,
                "{} overlaps {}",
                pair[0].id,
                pair[1].id
            );
        }
        for region in &REGIONS {
            assert!(region.start_id <= region.end_id);
        }
    }

    #[test_case(1, Some("kanto"))]
    #[test_case(151, Some("kanto"))]
    #[test_case(152, Some("johto"))]
    #[test_case(493, Some("sinnoh"))]
    #[test_case(1025, Some("paldea"))]
    #[test_case(1026, None)]
    #[test_case(0, None ; "zero")]
    #[test_case(-1, None ; "negative")]
    fn test_get_region_by_pokemon_id(id: i64, expected: Option<&str>) {
        assert_eq!(get_region_by_pokemon_id(id).map(|r| r.id), expected);
    }

    #[test]
    fn test_get_region_by_id() {
        assert_eq!(get_region_by_id("johto").map(|r| r.start_id), Some(152));
        assert_eq!(get_region_by_id("Hoenn").map(|r| r.generation), Some(3));
        assert!(get_region_by_id("orre").is_none());
    }

    #[test]
    fn test_count_and_offset() {
        assert_eq!(region_pokemon_count("kanto"), 151);
        assert_eq!(region_pokemon_count("johto"), 100);
        assert_eq!(region_pokemon_count("nowhere"), 0);
        assert_eq!(region_offset("kanto"), 0);
        assert_eq!(region_offset("johto"), 151);
        assert_eq!(region_offset("nowhere"), 0);
    }
}
