use super::{customer::Customer, order::Order};

/// An SMS about to be sent. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub text: String,
}

impl Notification {
    /// The confirmation sent once an order has been stored.
    pub fn order_received(customer: &Customer, order: &Order) -> Self {
        Self {
            to: customer.phone.clone(),
            text: format!(
                "Hi {}, your order for {} (Amount: KSH {:.2}) has been received. Order Time: {}. Thank you for your business!",
                customer.name,
                order.item,
                order.amount,
                order.time.format("%Y-%m-%d %H:%M:%S"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn renders_order_confirmation() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
        let customer = Customer {
            id: 7,
            name: "Jane".to_string(),
            code: "CUST007".to_string(),
            phone: "+254700000000".to_string(),
            email: None,
            created_at: at,
            updated_at: at,
        };
        let order = Order {
            id: 1,
            item: "Phone".to_string(),
            amount: 12000.0,
            time: at,
            customer_id: 7,
            customer: None,
            created_at: at,
            updated_at: at,
        };

        let n = Notification::order_received(&customer, &order);
        assert_eq!(n.to, "+254700000000");
        assert_eq!(
            n.text,
            "Hi Jane, your order for Phone (Amount: KSH 12000.00) has been received. \
             Order Time: 2025-03-14 09:30:00. Thank you for your business!"
        );
    }
}
