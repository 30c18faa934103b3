/// One record of tabular content: an ordered sequence of fields.
pub type Row = Vec<String>;

/// Ordered sequence of rows. Tables are compared positionally, so row `i`
/// of one table always lines up with row `i` of the other.
pub type Table = Vec<Row>;
