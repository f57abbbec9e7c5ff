//! New-customer form handling: turning free-text form input into the flat
//! JSON body `POST /customers` expects, and turning backend rejections
//! into one readable message.

use crate::error::{ChurnError, ChurnResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw form state. Every field is free text; blank means "use the default".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub struct NewCustomerForm {
    pub Customer_Age:             String,
    pub Gender:                   String,
    pub Dependent_count:          String,
    pub Education_Level:          String,
    pub Marital_Status:           String,
    pub Income_Category:          String,
    pub Card_Category:            String,
    pub Months_on_book:           String,
    pub Total_Relationship_Count: String,
    pub Months_Inactive_12_mon:   String,
    pub Contacts_Count_12_mon:    String,
    pub Credit_Limit:             String,
    pub Total_Revolving_Bal:      String,
    pub Avg_Open_To_Buy:          String,
    pub Total_Amt_Chng_Q4_Q1:     String,
    pub Total_Trans_Amt:          String,
    pub Total_Trans_Ct:           String,
    pub Total_Ct_Chng_Q4_Q1:      String,
    pub Avg_Utilization_Ratio:    String,
}

impl NewCustomerForm {
    /// Set a field by its wire name. Returns false for unknown names.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.slot_mut(name) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Assemble the request body. Blank fields take their defaults;
    /// non-numeric text in a numeric field is a validation error.
    pub fn to_payload(&self) -> ChurnResult<Value> {
        let mut body = Map::new();

        body.insert("Customer_Age".into(), numeric("Customer_Age", &self.Customer_Age, 18.0)?);
        body.insert("Gender".into(), text(&self.Gender, "M"));
        body.insert("Dependent_count".into(), numeric("Dependent_count", &self.Dependent_count, 0.0)?);
        body.insert("Education_Level".into(), text(&self.Education_Level, "Uneducated"));
        body.insert("Marital_Status".into(), text(&self.Marital_Status, "Single"));
        body.insert("Income_Category".into(), text(&self.Income_Category, "Less than $40K"));
        body.insert("Card_Category".into(), text(&self.Card_Category, "Blue"));

        let zero_default = [
            ("Credit_Limit",             &self.Credit_Limit),
            ("Total_Revolving_Bal",      &self.Total_Revolving_Bal),
            ("Avg_Open_To_Buy",          &self.Avg_Open_To_Buy),
            ("Months_on_book",           &self.Months_on_book),
            ("Total_Relationship_Count", &self.Total_Relationship_Count),
            ("Months_Inactive_12_mon",   &self.Months_Inactive_12_mon),
            ("Contacts_Count_12_mon",    &self.Contacts_Count_12_mon),
            ("Total_Trans_Amt",          &self.Total_Trans_Amt),
            ("Total_Trans_Ct",           &self.Total_Trans_Ct),
            ("Total_Amt_Chng_Q4_Q1",     &self.Total_Amt_Chng_Q4_Q1),
            ("Total_Ct_Chng_Q4_Q1",      &self.Total_Ct_Chng_Q4_Q1),
        ];
        for (name, raw) in zero_default {
            body.insert(name.into(), numeric(name, raw, 0.0)?);
        }

        body.insert(
            "Avg_Utilization_Ratio".into(),
            numeric("Avg_Utilization_Ratio", &self.Avg_Utilization_Ratio, 1.0)?,
        );

        Ok(Value::Object(body))
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut String> {
        let slot = match name {
            "Customer_Age"             => &mut self.Customer_Age,
            "Gender"                   => &mut self.Gender,
            "Dependent_count"          => &mut self.Dependent_count,
            "Education_Level"          => &mut self.Education_Level,
            "Marital_Status"           => &mut self.Marital_Status,
            "Income_Category"          => &mut self.Income_Category,
            "Card_Category"            => &mut self.Card_Category,
            "Months_on_book"           => &mut self.Months_on_book,
            "Total_Relationship_Count" => &mut self.Total_Relationship_Count,
            "Months_Inactive_12_mon"   => &mut self.Months_Inactive_12_mon,
            "Contacts_Count_12_mon"    => &mut self.Contacts_Count_12_mon,
            "Credit_Limit"             => &mut self.Credit_Limit,
            "Total_Revolving_Bal"      => &mut self.Total_Revolving_Bal,
            "Avg_Open_To_Buy"          => &mut self.Avg_Open_To_Buy,
            "Total_Amt_Chng_Q4_Q1"     => &mut self.Total_Amt_Chng_Q4_Q1,
            "Total_Trans_Amt"          => &mut self.Total_Trans_Amt,
            "Total_Trans_Ct"           => &mut self.Total_Trans_Ct,
            "Total_Ct_Chng_Q4_Q1"      => &mut self.Total_Ct_Chng_Q4_Q1,
            "Avg_Utilization_Ratio"    => &mut self.Avg_Utilization_Ratio,
            _                          => return None,
        };
        Some(slot)
    }
}

fn text(raw: &str, default: &str) -> Value {
    let trimmed = raw.trim();
    Value::String(if trimmed.is_empty() { default } else { trimmed }.to_string())
}

/// Integers stay integers on the wire; fractional input stays a float.
fn numeric(name: &str, raw: &str, default: f64) -> ChurnResult<Value> {
    let trimmed = raw.trim();
    let value = if trimmed.is_empty() {
        default
    } else {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ChurnError::Validation(format!("{name}: '{trimmed}' is not a number")))?
    };
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Ok(Value::from(value as i64))
    } else {
        Ok(Value::from(value))
    }
}

/// Flatten a creation error body into one message.
///
/// Recognised shapes, in order: `detail` as an array of field errors
/// (`{loc: [...], msg}` or plain strings), `detail` as a string, `message`,
/// `error` (string or any JSON). Anything else falls back to the raw body,
/// then to a generic message with the status.
pub fn flatten_error_body(status: u16, json: Option<&Value>, raw: &str) -> String {
    if let Some(json) = json {
        match json.get("detail") {
            Some(Value::Array(items)) => {
                return items.iter().map(describe_detail).collect::<Vec<_>>().join(", ");
            }
            Some(Value::String(s)) => return s.clone(),
            _ => {}
        }
        if let Some(msg) = json.get("message").filter(|v| truthy(v)) {
            return value_text(msg);
        }
        if let Some(err) = json.get("error").filter(|v| truthy(v)) {
            return value_text(err);
        }
    }
    if raw.trim().is_empty() {
        format!("Failed to create customer ({status})")
    } else {
        raw.to_string()
    }
}

fn describe_detail(item: &Value) -> String {
    if let Value::String(s) = item {
        return s.clone();
    }
    let loc = item
        .get("loc")
        .and_then(Value::as_array)
        .map(|parts| parts.iter().map(value_text).collect::<Vec<_>>().join("."))
        .unwrap_or_default();
    let msg = item
        .get("msg")
        .or_else(|| item.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("Validation error");
    if loc.is_empty() {
        msg.to_string()
    } else {
        format!("{loc}: {msg}")
    }
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other            => other.to_string(),
    }
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null      => false,
        Value::Bool(b)   => *b,
        Value::String(s) => !s.is_empty(),
        _                => true,
    }
}
