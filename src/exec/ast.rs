#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Echo {
        expr: String,
        escaped: bool,
    },
    /// Branches in source order; a `None` condition is the `else` branch.
    If {
        branches: Vec<(Option<String>, Vec<Node>)>,
    },
    Foreach {
        collection: String,
        key: Option<String>,
        item: String,
        body: Vec<Node>,
    },
}
