//! Defines the savings goal model and how it is stored.

use rusqlite::{Connection, Row, types::Value};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    db::optional_value,
    endpoints,
    resource::{Resource, validate_name, validate_positive},
};

/// An amount of money the user is saving towards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// The display name of the goal, e.g. "Emergency fund".
    pub name: String,
    /// The amount the user wants to reach.
    pub target_amount: f64,
    /// The amount saved so far. May exceed `target_amount`.
    #[serde(default)]
    pub current_amount: f64,
    /// When the user wants to reach the goal.
    #[serde(default)]
    pub target_date: Option<Date>,
}

impl Resource for Goal {
    const NAME: &'static str = "goal";
    const LABEL: &'static str = "Goal";
    const TABLE: &'static str = "goal";
    const ITEM_ENDPOINT: &'static str = endpoints::GOAL;
    const FIELDS: &'static [&'static str] =
        &["name", "target_amount", "current_amount", "target_date"];
    const REQUIRED_FIELDS: &'static [&'static str] = &["name", "target_amount"];

    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS goal (
                id INTEGER PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                target_amount REAL NOT NULL CHECK (target_amount > 0),
                current_amount REAL NOT NULL DEFAULT 0,
                target_date TEXT,
                created_at TEXT NOT NULL
            )",
            (),
        )?;

        Ok(())
    }

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            name: row.get(offset)?,
            target_amount: row.get(offset + 1)?,
            current_amount: row.get(offset + 2)?,
            target_date: row.get(offset + 3)?,
        })
    }

    fn to_sql_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Real(self.target_amount),
            Value::Real(self.current_amount),
            optional_value(self.target_date.map(|date| date.to_string())),
        ]
    }

    fn validate(&self) -> Result<(), Error> {
        validate_name("name", &self.name)?;
        validate_positive("target_amount", self.target_amount)?;

        if !self.current_amount.is_finite() || self.current_amount < 0.0 {
            return Err(Error::Validation(
                "current_amount must be zero or more".to_owned(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{Error, resource::Resource};

    use super::Goal;

    #[test]
    fn current_amount_defaults_to_zero() {
        let goal: Goal =
            serde_json::from_value(json!({"name": "Holiday", "target_amount": 2000.0})).unwrap();

        assert_eq!(goal.current_amount, 0.0);
        assert_eq!(goal.target_date, None);
    }

    #[test]
    fn over_achieved_goal_is_valid() {
        let goal = Goal {
            name: "Holiday".to_owned(),
            target_amount: 1000.0,
            current_amount: 1500.0,
            target_date: None,
        };

        assert_eq!(goal.validate(), Ok(()));
    }

    #[test]
    fn negative_current_amount_is_invalid() {
        let goal = Goal {
            name: "Holiday".to_owned(),
            target_amount: 1000.0,
            current_amount: -1.0,
            target_date: None,
        };

        assert!(matches!(goal.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn zero_target_is_invalid() {
        let goal = Goal {
            name: "Holiday".to_owned(),
            target_amount: 0.0,
            current_amount: 0.0,
            target_date: None,
        };

        assert_eq!(
            goal.validate(),
            Err(Error::NonPositiveAmount {
                field: "target_amount"
            })
        );
    }
}
