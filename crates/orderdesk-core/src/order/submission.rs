//! Submission validation and the fulfillment sheet row layout.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::draft::OrderLine;
use super::{Channel, OrderError, Priority, ShippingMethod};

/// Country written when the form leaves it blank; all orders ship domestically.
pub const DEFAULT_COUNTRY: &str = "United States";

/// `chrono` format of the `Ship by` column (`MM/DD/YY`).
pub const SHEET_DATE_FORMAT: &str = "%m/%d/%y";

/// Column headers of the fulfillment worksheet, in order.
pub const SHEET_COLUMNS: [&str; 26] = [
    "Channel *",
    "Sales order number *",
    "Custom order reference",
    "Do not ship before",
    "Ship by",
    "Priority *",
    "Notes",
    "Gift message",
    "Customer name *",
    "Address line 1 *",
    "Address line 2",
    "Company",
    "City *",
    "State *",
    "Zip code *",
    "Country *",
    "Email *",
    "Contact phone",
    "Service method",
    "SKU *",
    "Quantity ordered *",
    "Unit of measure *",
    "Lot",
    "Sale price",
    "Origin facility *",
    "Shipment Type",
];

/// Raw ship-to and shipment fields as posted by the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionForm {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub address_2: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub shipping_method: String,
    #[serde(default)]
    pub priority: String,
    /// `YYYY-MM-DD` from an HTML date input; blank means today.
    #[serde(default)]
    pub ship_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipTo {
    pub customer_name: String,
    pub address_1: String,
    pub address_2: String,
    pub company: String,
    pub city: String,
    /// Two-letter abbreviation, upper-cased.
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub email: String,
}

/// A submission that passed validation but has no order number yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub ship_to: ShipTo,
    pub shipping_method: Option<ShippingMethod>,
    pub priority: Priority,
    pub ship_by: NaiveDate,
    pub channel: Channel,
}

impl ValidatedOrder {
    #[must_use]
    pub fn with_order_number(self, order_number: String) -> OrderHeader {
        OrderHeader {
            order_number,
            ship_to: self.ship_to,
            shipping_method: self.shipping_method,
            priority: self.priority,
            ship_by: self.ship_by,
            channel: self.channel,
        }
    }
}

/// Everything written once per order, repeated on each of its sheet rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderHeader {
    pub order_number: String,
    pub ship_to: ShipTo,
    pub shipping_method: Option<ShippingMethod>,
    pub priority: Priority,
    pub ship_by: NaiveDate,
    pub channel: Channel,
}

impl OrderHeader {
    /// One sheet row per order line, laid out as [`SHEET_COLUMNS`].
    #[must_use]
    pub fn rows(&self, lines: &[OrderLine], origin_facility: &str) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|line| {
                vec![
                    self.channel.sheet_label().to_string(),
                    self.order_number.clone(),
                    String::new(),
                    String::new(),
                    self.ship_by.format(SHEET_DATE_FORMAT).to_string(),
                    self.priority.label().to_string(),
                    String::new(),
                    String::new(),
                    self.ship_to.customer_name.clone(),
                    self.ship_to.address_1.clone(),
                    self.ship_to.address_2.clone(),
                    self.ship_to.company.clone(),
                    self.ship_to.city.clone(),
                    self.ship_to.state.clone(),
                    self.ship_to.zip_code.clone(),
                    self.ship_to.country.clone(),
                    self.ship_to.email.clone(),
                    String::new(),
                    self.shipping_method
                        .map(|m| m.label().to_string())
                        .unwrap_or_default(),
                    line.sku.clone(),
                    line.quantity.to_string(),
                    "ea".to_string(),
                    String::new(),
                    String::new(),
                    origin_facility.to_string(),
                    "Parcel".to_string(),
                ]
            })
            .collect()
    }
}

/// Validates the form against the pending lines.
///
/// Checks run in order: required fields, state abbreviation, ship-by date,
/// shipping method, at least one line. The first failure is returned and
/// nothing is written.
///
/// # Errors
///
/// - [`OrderError::MissingRequiredFields`] lists every blank required field.
/// - [`OrderError::StateNotAbbreviated`] when the state is not 2 characters.
/// - [`OrderError::InvalidShipByDate`] when `ship_by` is not `YYYY-MM-DD`.
/// - [`OrderError::UnknownShippingMethod`] / [`OrderError::UnknownPriority`]
///   for values outside the fixed option lists.
/// - [`OrderError::NoItems`] when `lines` is empty.
pub fn validate_submission(
    form: &SubmissionForm,
    lines: &[OrderLine],
    today: NaiveDate,
) -> Result<ValidatedOrder, OrderError> {
    let country = if form.country.trim().is_empty() {
        DEFAULT_COUNTRY
    } else {
        form.country.trim()
    };

    let required: [(&'static str, &str); 8] = [
        ("Customer Name", form.customer_name.as_str()),
        ("Shipping Address Line 1", form.address_1.as_str()),
        ("City", form.city.as_str()),
        ("State", form.state.as_str()),
        ("ZIP Code", form.zip_code.as_str()),
        ("Country", country),
        ("Email", form.email.as_str()),
        ("Priority", form.priority.as_str()),
    ];
    let missing: Vec<&'static str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| *label)
        .collect();
    if !missing.is_empty() {
        return Err(OrderError::MissingRequiredFields(missing));
    }

    let state = form.state.trim();
    if state.chars().count() != 2 {
        return Err(OrderError::StateNotAbbreviated);
    }

    let ship_by = match form.ship_by.trim() {
        "" => today,
        raw => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| OrderError::InvalidShipByDate(raw.to_string()))?,
    };

    let shipping_method = match form.shipping_method.trim() {
        "" => None,
        raw => Some(raw.parse::<ShippingMethod>()?),
    };
    let priority = form.priority.parse::<Priority>()?;

    if lines.is_empty() {
        return Err(OrderError::NoItems);
    }

    let total: u64 = lines.iter().map(|l| u64::from(l.quantity)).sum();

    Ok(ValidatedOrder {
        ship_to: ShipTo {
            customer_name: form.customer_name.trim().to_string(),
            address_1: form.address_1.trim().to_string(),
            address_2: form.address_2.trim().to_string(),
            company: form.company.trim().to_string(),
            city: form.city.trim().to_string(),
            state: state.to_uppercase(),
            zip_code: form.zip_code.trim().to_string(),
            country: country.to_string(),
            email: form.email.trim().to_string(),
        },
        shipping_method,
        priority,
        ship_by,
        channel: Channel::for_total_quantity(total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    fn complete_form() -> SubmissionForm {
        SubmissionForm {
            customer_name: "Jane Doe".to_string(),
            address_1: "1 Main St".to_string(),
            address_2: String::new(),
            company: "Acme".to_string(),
            city: "Springfield".to_string(),
            state: "il".to_string(),
            zip_code: "62701".to_string(),
            country: String::new(),
            email: "jane@example.com".to_string(),
            shipping_method: "FedEx 2Day".to_string(),
            priority: "High".to_string(),
            ship_by: "2024-03-10".to_string(),
        }
    }

    fn lines(quantities: &[u32]) -> Vec<OrderLine> {
        quantities
            .iter()
            .enumerate()
            .map(|(i, q)| OrderLine {
                title: "Serum".to_string(),
                sku: format!("SKU-{i}"),
                quantity: *q,
            })
            .collect()
    }

    #[test]
    fn complete_form_validates() {
        let order = validate_submission(&complete_form(), &lines(&[3, 4]), today()).unwrap();
        assert_eq!(order.ship_to.state, "IL");
        assert_eq!(order.ship_to.country, DEFAULT_COUNTRY);
        assert_eq!(order.shipping_method, Some(ShippingMethod::FedEx2Day));
        assert_eq!(order.priority, Priority::High);
        assert_eq!(order.ship_by, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(order.channel, Channel::Direct);
    }

    #[test]
    fn each_blank_required_field_blocks_submission() {
        type Setter = fn(&mut SubmissionForm);
        let blankers: [(&str, Setter); 7] = [
            ("Customer Name", |f| f.customer_name.clear()),
            ("Shipping Address Line 1", |f| f.address_1 = "  ".to_string()),
            ("City", |f| f.city.clear()),
            ("State", |f| f.state.clear()),
            ("ZIP Code", |f| f.zip_code.clear()),
            ("Email", |f| f.email.clear()),
            ("Priority", |f| f.priority.clear()),
        ];
        for (label, blank) in blankers {
            let mut form = complete_form();
            blank(&mut form);
            let err = validate_submission(&form, &lines(&[1]), today()).unwrap_err();
            assert_eq!(err, OrderError::MissingRequiredFields(vec![label]));
        }
    }

    #[test]
    fn state_must_be_exactly_two_characters() {
        for state in ["I", "ILL", "Illinois"] {
            let mut form = complete_form();
            form.state = state.to_string();
            assert_eq!(
                validate_submission(&form, &lines(&[1]), today()),
                Err(OrderError::StateNotAbbreviated),
                "{state} should be rejected"
            );
        }
    }

    #[test]
    fn empty_order_is_rejected() {
        assert_eq!(
            validate_submission(&complete_form(), &[], today()),
            Err(OrderError::NoItems)
        );
    }

    #[test]
    fn blank_ship_by_defaults_to_today_and_method_is_optional() {
        let mut form = complete_form();
        form.ship_by.clear();
        form.shipping_method.clear();
        let order = validate_submission(&form, &lines(&[1]), today()).unwrap();
        assert_eq!(order.ship_by, today());
        assert_eq!(order.shipping_method, None);
    }

    #[test]
    fn malformed_ship_by_is_rejected() {
        let mut form = complete_form();
        form.ship_by = "03/10/2024".to_string();
        assert!(matches!(
            validate_submission(&form, &lines(&[1]), today()),
            Err(OrderError::InvalidShipByDate(_))
        ));
    }

    #[test]
    fn channel_is_bulk_at_one_hundred_units() {
        let order = validate_submission(&complete_form(), &lines(&[50, 30, 20]), today()).unwrap();
        assert_eq!(order.channel, Channel::Bulk);
        let order = validate_submission(&complete_form(), &lines(&[50, 30, 19]), today()).unwrap();
        assert_eq!(order.channel, Channel::Direct);
    }

    #[test]
    fn rows_repeat_header_for_each_line() {
        let order_lines = lines(&[3, 4]);
        let header = validate_submission(&complete_form(), &order_lines, today())
            .unwrap()
            .with_order_number("MKT0307241".to_string());
        let rows = header.rows(&order_lines, "BDLs001");

        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.len(), SHEET_COLUMNS.len());
        }

        let col = |name: &str| SHEET_COLUMNS.iter().position(|c| *c == name).unwrap();
        assert_eq!(rows[0][col("Channel *")], "Influencer D2C");
        assert_eq!(rows[0][col("Sales order number *")], "MKT0307241");
        assert_eq!(rows[1][col("Sales order number *")], "MKT0307241");
        assert_eq!(rows[0][col("Ship by")], "03/10/24");
        assert_eq!(rows[0][col("Service method")], "FedEx 2Day");
        assert_eq!(rows[0][col("SKU *")], "SKU-0");
        assert_eq!(rows[1][col("SKU *")], "SKU-1");
        assert_eq!(rows[1][col("Quantity ordered *")], "4");
        assert_eq!(rows[0][col("Unit of measure *")], "ea");
        assert_eq!(rows[0][col("Origin facility *")], "BDLs001");
        assert_eq!(rows[0][col("Shipment Type")], "Parcel");
        assert_eq!(rows[0][col("Country *")], "United States");
    }
}
