//! Approximate points in Natal / RN neighborhoods.
//!
//! Coordinates are rounded neighborhood-level positions, close enough to
//! keep neighborhoods geographically apart in tests.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub neighborhood: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, neighborhood: &'static str, lat: f64, lng: f64) -> Self {
        Self {
            name,
            neighborhood,
            lat,
            lng,
        }
    }
}

/// Where the seller usually leaves from.
pub const DEPOT: (f64, f64) = (-5.7945, -35.2110);

// ============================================================================
// Customers, grouped by neighborhood
// ============================================================================

pub const PONTA_NEGRA: &[Location] = &[
    Location::new("Loja Mar Azul", "Ponta Negra", -5.8795, -35.1712),
    Location::new("Salão Estrela", "Ponta Negra", -5.8830, -35.1685),
    Location::new("Mercadinho Duna", "Ponta Negra", -5.8762, -35.1740),
    Location::new("Farmácia Morro", "Ponta Negra", -5.8858, -35.1660),
];

pub const LAGOA_NOVA: &[Location] = &[
    Location::new("Boutique Arena", "Lagoa Nova", -5.8282, -35.2105),
    Location::new("Ótica Central", "Lagoa Nova", -5.8310, -35.2068),
    Location::new("Padaria Sol", "Lagoa Nova", -5.8255, -35.2131),
];

pub const TIROL: &[Location] = &[
    Location::new("Ateliê Tirol", "Tirol", -5.7968, -35.2062),
    Location::new("Perfumaria Rosa", "Tirol", -5.7990, -35.2041),
    Location::new("Empório Nobre", "Tirol", -5.7941, -35.2085),
];

pub const ALECRIM: &[Location] = &[
    Location::new("Bazar Alecrim", "Alecrim", -5.8003, -35.2248),
    Location::new("Armarinho Feira", "Alecrim", -5.8027, -35.2270),
];
