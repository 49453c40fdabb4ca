use poparchive_core::newtypes::Position;

/// A mutation segregating in a population.
///
/// The tree sequence tables refer to mutations by index ("key")
/// into the population's mutation vector; the position stored here
/// is the coordinate those records map to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mutation {
    /// Genomic position
    pub position: Position,
    /// Effect size (selection coefficient)
    pub effect_size: f64,
    /// Dominance
    pub dominance: f64,
    /// Generation in which the mutation arose
    pub origin: u32,
    /// Client-defined label
    pub label: u16,
    /// `true` if the mutation does not affect fitness
    pub neutral: bool,
}

impl Mutation {
    /// Create a neutral mutation at `position`, arising in
    /// generation `origin`.
    pub fn new_neutral<P: Into<Position>>(position: P, origin: u32) -> Self {
        Self {
            position: position.into(),
            effect_size: 0.0,
            dominance: 1.0,
            origin,
            label: 0,
            neutral: true,
        }
    }
}
