/// Axis labels in the order readers assume when a format does not say.
///
/// S = scene, T = time, C = channel, Z = depth, Y = rows, X = columns.
pub const DEFAULT_DIMENSION_ORDER: &str = "STCZYX";
