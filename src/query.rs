//! A small, typed rendition of the query surface offered by the remote
//! data store: equality filters, ordering, limits, and a select list that
//! may embed the fields of a related collection.
//!
//! The query itself does nothing; a [`DataStore`](crate::store::DataStore)
//! is responsible for running it.

use serde_json::Value;

use crate::error::DataAccessError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    table: String,
    columns: String,
    filters: Vec<Filter>,
    order: Vec<Order>,
    limit: Option<usize>,
}

impl Query {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn order(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order.push(Order {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// The select list as written, with insignificant whitespace removed.
    pub fn columns(&self) -> String {
        self.columns.chars().filter(|c| !c.is_whitespace()).collect()
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn ordering(&self) -> &[Order] {
        &self.order
    }

    pub fn row_limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn parse_select(&self) -> Result<Vec<SelectItem>, DataAccessError> {
        SelectItem::parse(&self.columns)
    }
}

/// One entry of a select list.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectItem {
    All,
    Column(String),
    Embed {
        relation: String,
        items: Vec<SelectItem>,
    },
}

impl SelectItem {
    /// Parse a select list such as `*, communities(name)`.
    pub fn parse(input: &str) -> Result<Vec<SelectItem>, DataAccessError> {
        let compact: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
        let mut pos = 0;
        let items = parse_list(&compact, &mut pos)?;
        if pos != compact.len() {
            return Err(malformed(input));
        }
        Ok(items)
    }
}

fn malformed(input: &str) -> DataAccessError {
    DataAccessError::new(format!("failed to parse select parameter ({input})"))
}

fn parse_list(chars: &[char], pos: &mut usize) -> Result<Vec<SelectItem>, DataAccessError> {
    let mut items = Vec::new();
    loop {
        let start = *pos;
        while *pos < chars.len() && !matches!(chars[*pos], ',' | '(' | ')') {
            *pos += 1;
        }
        let name: String = chars[start..*pos].iter().collect();
        if name.is_empty() {
            return Err(malformed(&chars.iter().collect::<String>()));
        }

        let item = if chars.get(*pos) == Some(&'(') {
            *pos += 1;
            let inner = parse_list(chars, pos)?;
            if chars.get(*pos) != Some(&')') {
                return Err(malformed(&chars.iter().collect::<String>()));
            }
            *pos += 1;
            SelectItem::Embed {
                relation: name,
                items: inner,
            }
        } else if name == "*" {
            SelectItem::All
        } else {
            SelectItem::Column(name)
        };
        items.push(item);

        match chars.get(*pos) {
            Some(',') => *pos += 1,
            _ => return Ok(items),
        }
    }
}

impl Filter {
    /// Render the filter value the way the store's URL syntax expects it.
    pub fn operand(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl Order {
    pub fn to_param(&self) -> String {
        match self.direction {
            Direction::Ascending => format!("{}.asc", self.column),
            Direction::Descending => format!("{}.desc", self.column),
        }
    }
}
