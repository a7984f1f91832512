//! Result projector
//!
//! Shapes entities into their public response form. Fields that are absent
//! or empty are dropped from the output rather than emitted as `null`/`""`.

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::data::types::RestaurantRow;

/// A public response shape built from an entity
pub trait ResponseShape<E>: Serialize {
    fn from_entity(entity: &E) -> Self;
}

/// One entity or a sequence of entities to project
#[derive(Debug, Clone, Copy)]
pub enum Entities<'a, E> {
    One(&'a E),
    Many(&'a [E]),
}

/// Project entities through shape `S`
///
/// A single entity yields an object, a sequence yields an array in input order.
pub fn project<S, E>(entities: Entities<'_, E>) -> Result<Value, serde_json::Error>
where
    S: ResponseShape<E>,
{
    match entities {
        Entities::One(entity) => shape::<S, E>(entity),
        Entities::Many(entities) => entities
            .iter()
            .map(shape::<S, E>)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
    }
}

fn shape<S, E>(entity: &E) -> Result<Value, serde_json::Error>
where
    S: ResponseShape<E>,
{
    serde_json::to_value(S::from_entity(entity)).map(prune_empty)
}

fn prune_empty(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !is_empty(v))
                .collect::<Map<_, _>>(),
        ),
        other => other,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Restaurant as returned by listing and search
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RestaurantSummary {
    pub id: i64,
    pub name: String,
}

impl ResponseShape<RestaurantRow> for RestaurantSummary {
    fn from_entity(row: &RestaurantRow) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: i64, name: &str) -> RestaurantRow {
        RestaurantRow {
            id,
            name: name.to_string(),
            cash_balance: 99.5,
        }
    }

    #[test]
    fn test_project_single_entity() {
        let value = project::<RestaurantSummary, _>(Entities::One(&row(7, "Kopi"))).unwrap();
        assert_eq!(value, json!({"id": 7, "name": "Kopi"}));
    }

    #[test]
    fn test_project_sequence_keeps_order() {
        let rows = vec![row(3, "C"), row(1, "A"), row(2, "B")];
        let value = project::<RestaurantSummary, _>(Entities::Many(&rows)).unwrap();
        assert_eq!(
            value,
            json!([
                {"id": 3, "name": "C"},
                {"id": 1, "name": "A"},
                {"id": 2, "name": "B"}
            ])
        );
    }

    #[test]
    fn test_project_empty_sequence() {
        let rows: Vec<RestaurantRow> = Vec::new();
        let value = project::<RestaurantSummary, _>(Entities::Many(&rows)).unwrap();
        assert_eq!(value, json!([]));
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let value = project::<RestaurantSummary, _>(Entities::One(&row(4, ""))).unwrap();
        assert_eq!(value, json!({"id": 4}));
        assert!(value.get("name").is_none());
    }

    #[derive(Serialize)]
    struct Nickname {
        id: i64,
        nickname: Option<String>,
    }

    impl ResponseShape<RestaurantRow> for Nickname {
        fn from_entity(row: &RestaurantRow) -> Self {
            Self {
                id: row.id,
                nickname: None,
            }
        }
    }

    #[test]
    fn test_absent_fields_are_omitted_not_null() {
        let value = project::<Nickname, _>(Entities::One(&row(1, "A"))).unwrap();
        assert_eq!(value, json!({"id": 1}));
    }

    #[test]
    fn test_zero_values_are_kept() {
        let value = project::<RestaurantSummary, _>(Entities::One(&row(0, "Zero"))).unwrap();
        assert_eq!(value, json!({"id": 0, "name": "Zero"}));
    }
}
