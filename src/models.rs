use mongodb::bson::{oid::ObjectId, Bson};
use serde::{Deserialize, Serialize};

/// A person candles can be lit for.
///
/// Exactly one of `object_id` and `id` is the addressing identity, depending
/// on the configured [`IdStrategy`](crate::config::IdStrategy); the other
/// stays `None` and is omitted from serialized documents.
#[derive(Debug, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub age: i64,
    pub city: String,
    /// Append-only. A visitor lighting two candles appears twice.
    pub users: Vec<String>,
}

/// The singleton counter document, keyed by its logical `name`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Counter {
    pub name: String,
    pub counter: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreatePerson {
    pub id: Option<String>,
    pub name: String,
    pub age: i64,
    pub city: String,
}

#[derive(Debug, Serialize)]
pub struct UserIdResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct PersonsResponse {
    #[serde(rename = "Persons")]
    pub persons: Vec<Person>,
}

#[derive(Debug, Serialize)]
pub struct CounterResponse {
    #[serde(rename = "counterLitCandles")]
    pub counter_lit_candles: i64,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    #[serde(rename = "insertedId")]
    pub inserted_id: Bson,
}

#[derive(Debug, Serialize)]
pub struct LitCandleResponse {
    #[serde(rename = "updatedPerson")]
    pub updated_person: Person,
    #[serde(rename = "updatedCounter")]
    pub updated_counter: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    fn sample_person() -> Person {
        Person {
            object_id: None,
            id: None,
            name: "Ana".to_string(),
            age: 30,
            city: "Tel Aviv".to_string(),
            users: Vec::new(),
        }
    }

    #[test]
    fn person_omits_absent_identifiers() {
        let value = to_value(sample_person()).unwrap();
        let object = value.as_object().unwrap();

        assert!(!object.contains_key("_id"));
        assert!(!object.contains_key("id"));
        assert_eq!(value["name"], "Ana");
        assert_eq!(value["users"], json!([]));
    }

    #[test]
    fn person_keeps_client_supplied_id() {
        let mut person = sample_person();
        person.id = Some("ana-1".to_string());

        let value = to_value(person).unwrap();
        assert_eq!(value["id"], "ana-1");
    }

    #[test]
    fn persons_response_uses_capitalized_key() {
        let value = to_value(PersonsResponse {
            persons: vec![sample_person()],
        })
        .unwrap();

        assert!(value.get("Persons").is_some());
        assert_eq!(value["Persons"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn counter_response_field_name() {
        let value = to_value(CounterResponse {
            counter_lit_candles: 7,
        })
        .unwrap();

        assert_eq!(value, json!({ "counterLitCandles": 7 }));
    }

    #[test]
    fn lit_candle_response_field_names() {
        let value = to_value(LitCandleResponse {
            updated_person: sample_person(),
            updated_counter: 3,
        })
        .unwrap();

        assert!(value.get("updatedPerson").is_some());
        assert_eq!(value["updatedCounter"], 3);
    }

    #[test]
    fn create_person_id_is_optional() {
        let payload: CreatePerson =
            serde_json::from_value(json!({ "name": "Ana", "age": 30, "city": "Tel Aviv" }))
                .unwrap();

        assert!(payload.id.is_none());
        assert_eq!(payload.age, 30);
    }
}
