//! Filters, ordering and limits for `TournamentStore::find`.

use crate::models::{Tournament, TournamentId, TournamentPhase, TournamentStatus};
use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;

/// A filterable / sortable tournament column.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Field {
    Id,
    Name,
    Game,
    Status,
    Phase,
    RegistrationOpenDate,
    RegistrationCloseDate,
    PlayingStartDate,
    FinishDate,
    PaymentDate,
    CreatedAt,
    UpdatedAt,
}

/// A typed column value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Id(TournamentId),
    Text(String),
    Status(TournamentStatus),
    Phase(TournamentPhase),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Null,
}

impl Value {
    /// Ordering between two values of the same kind; None across kinds or with Null.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Id(a), Value::Id(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Status(a), Value::Status(b)) => Some(a.cmp(b)),
            (Value::Phase(a), Value::Phase(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<TournamentId> for Value {
    fn from(v: TournamentId) -> Self {
        Value::Id(v)
    }
}

impl From<TournamentStatus> for Value {
    fn from(v: TournamentStatus) -> Self {
        Value::Status(v)
    }
}

impl From<TournamentPhase> for Value {
    fn from(v: TournamentPhase) -> Self {
        Value::Phase(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl Tournament {
    /// Value of one column of this record.
    pub fn field(&self, field: Field) -> Value {
        match field {
            Field::Id => Value::Id(self.id),
            Field::Name => Value::Text(self.name.clone()),
            Field::Game => Value::Text(self.game.clone()),
            Field::Status => Value::Status(self.status),
            Field::Phase => Value::Phase(self.phase),
            Field::RegistrationOpenDate => Value::Date(self.registration_open_date),
            Field::RegistrationCloseDate => Value::Date(self.registration_close_date),
            Field::PlayingStartDate => Value::Date(self.playing_start_date),
            Field::FinishDate => Value::Date(self.finish_date),
            Field::PaymentDate => self.payment_date.map_or(Value::Null, Value::Date),
            Field::CreatedAt => Value::Timestamp(self.created_at),
            Field::UpdatedAt => Value::Timestamp(self.updated_at),
        }
    }
}

/// A single condition on one column. Conditions in a list are ANDed.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Eq(Field, Value),
    Neq(Field, Value),
    /// SQL-style pattern on a text column; `%` matches any run of characters.
    Like(Field, String),
    In(Field, Vec<Value>),
    Lt(Field, Value),
    Lte(Field, Value),
    Gt(Field, Value),
    Gte(Field, Value),
}

impl Filter {
    pub fn matches(&self, t: &Tournament) -> bool {
        match self {
            Filter::Eq(f, v) => t.field(*f) == *v,
            Filter::Neq(f, v) => t.field(*f) != *v,
            Filter::Like(f, pattern) => match t.field(*f) {
                Value::Text(s) => like(pattern, &s),
                _ => false,
            },
            Filter::In(f, values) => {
                let actual = t.field(*f);
                values.iter().any(|v| *v == actual)
            }
            Filter::Lt(f, v) => t.field(*f).compare(v) == Some(Ordering::Less),
            Filter::Lte(f, v) => matches!(
                t.field(*f).compare(v),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Filter::Gt(f, v) => t.field(*f).compare(v) == Some(Ordering::Greater),
            Filter::Gte(f, v) => matches!(
                t.field(*f).compare(v),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }
}

/// True when every filter matches.
pub fn matches_all(filters: &[Filter], t: &Tournament) -> bool {
    filters.iter().all(|f| f.matches(t))
}

/// `%`-wildcard match, case-sensitive.
fn like(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('%').collect();
    if parts.len() == 1 {
        return pattern == text;
    }
    let first = parts[0];
    let last = parts[parts.len() - 1];
    if !text.starts_with(first) {
        return false;
    }
    let mut rest = &text[first.len()..];
    for part in &parts[1..parts.len() - 1] {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Filters, ordering and an optional row limit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Vec<(Field, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, field: Field, direction: Direction) -> Self {
        self.order_by.push((field, direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Compare two records by the ordering fields, in order. Nulls sort first.
    pub fn compare(&self, a: &Tournament, b: &Tournament) -> Ordering {
        for (field, direction) in &self.order_by {
            let (va, vb) = (a.field(*field), b.field(*field));
            let ord = match (&va, &vb) {
                (Value::Null, Value::Null) => Ordering::Equal,
                (Value::Null, _) => Ordering::Less,
                (_, Value::Null) => Ordering::Greater,
                _ => va.compare(&vb).unwrap_or(Ordering::Equal),
            };
            let ord = match direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Apply filters, ordering and limit to a set of records.
    pub fn run<'a, I>(&self, records: I) -> Vec<Tournament>
    where
        I: IntoIterator<Item = &'a Tournament>,
    {
        let mut out: Vec<Tournament> = records
            .into_iter()
            .filter(|t| matches_all(&self.filters, t))
            .cloned()
            .collect();
        out.sort_by(|a, b| self.compare(a, b));
        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::like;

    #[test]
    fn like_wildcards() {
        assert!(like("Spring%", "Spring Cup"));
        assert!(like("%Cup", "Spring Cup"));
        assert!(like("%ring%", "Spring Cup"));
        assert!(like("S%g C%p", "Spring Cup"));
        assert!(like("%", ""));
        assert!(!like("Cup%", "Spring Cup"));
        assert!(!like("a%a", "a"));
        assert!(like("exact", "exact"));
    }
}
