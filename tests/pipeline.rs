use donations::models::company::Company;
use donations::models::donation::{DonationError, DonationTask, FulfillmentResult};
use donations::models::envelope::{EnvelopeError, NotificationEnvelope};
use donations::models::product::Product;
use donations::requests::donation::DonationRequest;
use rust_decimal::Decimal;
use uuid::Uuid;

fn sample_company() -> Company {
    Company {
        id: Uuid::new_v4(),
        name: "OmniCorp Dynamics".to_string(),
        email: "contact@omnicorp.example".to_string(),
        img: "omnicorp.png".to_string(),
    }
}

fn sample_products() -> Vec<Product> {
    vec![
        Product {
            id: Uuid::new_v4(),
            name: "Neural Visor".to_string(),
            description: "Consumer-grade augmented vision implant".to_string(),
            price: Decimal::new(19999, 2),
        },
        Product {
            id: Uuid::new_v4(),
            name: "Patrol Drone Mk II".to_string(),
            description: "Autonomous neighborhood security drone".to_string(),
            price: Decimal::new(45050, 2),
        },
    ]
}

/// Wraps a payload the way the pub/sub layer does before the queue delivers
/// it to the worker.
fn deliver_through_topic(payload: &str) -> String {
    serde_json::json!({
        "Type": "Notification",
        "MessageId": Uuid::new_v4().to_string(),
        "TopicArn": "arn:aws:sns:us-east-1:123:donations",
        "Subject": "Donation Processing Task",
        "Message": payload,
        "Timestamp": "2026-08-28T12:00:00.000Z",
        "MessageAttributes": {
            "messageType": { "Type": "String", "Value": "ProcessingTask" },
            "target": { "Type": "String", "Value": "worker" }
        }
    })
    .to_string()
}

#[test]
fn published_task_round_trips_through_the_envelope_codec() {
    let task = DonationTask::new(
        "donor@example.com".to_string(),
        2,
        sample_company(),
        sample_products(),
    );

    let payload = serde_json::to_string(&task).unwrap();
    let body = deliver_through_topic(&payload);

    let envelope = NotificationEnvelope::parse(&body).unwrap();
    assert_eq!(
        envelope
            .message_attributes
            .get("target")
            .map(|a| a.value.as_str()),
        Some("worker")
    );

    let decoded = envelope.task().unwrap();
    assert_eq!(decoded.email, task.email);
    assert_eq!(decoded.amount, 2);
    assert_eq!(decoded.company.id, task.company.id);
    assert_eq!(decoded.company.name, task.company.name);
    assert_eq!(decoded.company.img, task.company.img);
    assert_eq!(decoded.products.len(), 2);
    for (original, roundtripped) in task.products.iter().zip(decoded.products.iter()) {
        assert_eq!(roundtripped.id, original.id);
        assert_eq!(roundtripped.name, original.name);
        assert_eq!(roundtripped.description, original.description);
        assert_eq!(roundtripped.price, original.price);
    }
    assert_eq!(decoded.total(), Decimal::new(65049, 2));
}

#[test]
fn fulfillment_total_comes_from_the_snapshot_not_the_catalog() {
    let mut products = sample_products();
    let task = DonationTask::new(
        "donor@example.com".to_string(),
        2,
        sample_company(),
        products.clone(),
    );
    let result = FulfillmentResult::processing(&task);

    // A later catalog price change must not affect the captured total.
    products[0].price = Decimal::new(99999, 2);
    assert_eq!(result.total_amount, Decimal::new(65049, 2));
    assert_eq!(result.total_amount, task.total());
}

#[test]
fn out_of_range_amounts_never_reach_the_publish_path() {
    for amount in [0, 4, 5, -3] {
        let request = DonationRequest {
            email: "donor@example.com".to_string(),
            amount,
        };
        let err = request.validate().unwrap_err();
        assert!(matches!(err, DonationError::InvalidAmount));
        assert_eq!(err.to_string(), "amount must be between 1 and 3");
    }
}

#[test]
fn null_embedded_payload_is_rejected_without_a_task_decode() {
    let body = serde_json::json!({
        "Type": "Notification",
        "MessageId": "m-1",
        "TopicArn": "arn:aws:sns:us-east-1:123:donations",
        "Message": null,
        "Timestamp": "2026-08-28T12:00:00.000Z"
    })
    .to_string();

    assert!(matches!(
        NotificationEnvelope::parse(&body),
        Err(EnvelopeError::EmptyPayload)
    ));
}

#[test]
fn non_task_payload_fails_the_second_decode_pass() {
    let body = deliver_through_topic("{\"pedidoId\": 17}");
    let envelope = NotificationEnvelope::parse(&body).unwrap();
    assert!(matches!(envelope.task(), Err(EnvelopeError::Payload(_))));
}
