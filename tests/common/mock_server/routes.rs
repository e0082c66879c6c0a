use crate::common::{
    mock_server::{MockServerConfiguration, MockServerStorage},
    DECLINED_CARD_NUMBER,
};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// POST /secure/RestGW/Gateway/Transaction/{action}
pub(super) async fn transaction(
    action: web::Path<String>,
    configuration: web::Data<MockServerConfiguration>,
    storage: web::Data<MockServerStorage>,
    body: web::Json<Map<String, Value>>,
) -> HttpResponse {
    let body = body.into_inner();

    if string_field(&body, "merchantKey") != Some(configuration.merchant_key.as_str())
        || string_field(&body, "processorId") != Some(configuration.processor_id.as_str())
    {
        return failure(&["Invalid merchant credentials"]);
    }

    match action.as_str() {
        "Sale" | "Auth" => sale(&action, &storage, body),
        "Void" => void(&storage, &body),
        "Query" => query(&storage, &body),
        "VaultCreateContainer" => vault_create_container(&storage, body),
        "VaultQueryVault" => vault_query(&storage, &body),
        "VaultDeleteContainerAndAllAsscData" => vault_delete(&storage, &body),
        // Anything else gets the plain text page the gateway's load balancer serves
        _ => HttpResponse::ServiceUnavailable()
            .content_type("text/plain")
            .body("Service Unavailable"),
    }
}

fn sale(action: &str, storage: &MockServerStorage, body: Map<String, Value>) -> HttpResponse {
    let missing: Vec<(&str, &str)> = [
        ("transactionAmount", "Transaction amount is required"),
        ("cardNumber", "Card number is required"),
    ]
    .into_iter()
    .filter(|(key, _)| !body.contains_key(*key))
    .collect();
    if !missing.is_empty() {
        return validation_failure(&missing);
    }

    if string_field(&body, "cardNumber") == Some(DECLINED_CARD_NUMBER) {
        return failure(&["Card declined", "Do not honor"]);
    }

    // The gateway reports timestamps in its own local time, without offset
    let trans_date_and_time = Utc::now()
        .with_timezone(&chrono_tz::America::New_York)
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string();
    let ref_number = Uuid::new_v4().simple().to_string();
    let amount = body["transactionAmount"].clone();

    let data = json!({
        "refNumber": ref_number,
        "authCode": "OK1234",
        "transactionType": action,
        "transactionAmount": amount,
        "transDateAndTime": trans_date_and_time,
        "settleDate": Utc::now().format("%m%d%Y").to_string(),
    });

    if let Some(order) = data.as_object() {
        storage
            .write()
            .unwrap()
            .transactions
            .insert(ref_number, order.clone());
    }

    success(data)
}

fn void(storage: &MockServerStorage, body: &Map<String, Value>) -> HttpResponse {
    let ref_number = match string_field(body, "refNumber") {
        Some(ref_number) => ref_number,
        None => return validation_failure(&[("refNumber", "Reference number is required")]),
    };

    match storage.write().unwrap().transactions.get_mut(ref_number) {
        Some(order) => {
            order.insert("voided".to_string(), Value::Bool(true));
            success(json!({ "refNumber": ref_number }))
        }
        None => failure(&["Transaction not found"]),
    }
}

fn query(storage: &MockServerStorage, body: &Map<String, Value>) -> HttpResponse {
    let orders: Vec<Value> = storage
        .read()
        .unwrap()
        .transactions
        .values()
        .cloned()
        .map(Value::Object)
        .collect();

    // Echo the query filters back, so that tests can assert on what the client sent
    let filters: Map<String, Value> = body
        .iter()
        .filter(|(key, _)| key.starts_with("query"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    success(json!({
        "orders": orders,
        "queryFilters": filters,
    }))
}

fn vault_create_container(storage: &MockServerStorage, body: Map<String, Value>) -> HttpResponse {
    if !body.contains_key("ownerName") {
        return validation_failure(&[("ownerName", "Owner name is required")]);
    }

    let id = Uuid::new_v4().simple().to_string();
    let container: Map<String, Value> = body
        .into_iter()
        .filter(|(key, _)| key != "merchantKey" && key != "processorId")
        .chain([("id".to_string(), Value::String(id.clone()))])
        .collect();

    storage.write().unwrap().vault.insert(id.clone(), container);

    success(json!({ "id": id }))
}

fn vault_query(storage: &MockServerStorage, body: &Map<String, Value>) -> HttpResponse {
    let container = string_field(body, "id")
        .and_then(|id| storage.read().unwrap().vault.get(id).cloned());

    match container {
        Some(container) => success(json!({ "vaultContainer": container })),
        None => failure(&["Vault container not found"]),
    }
}

fn vault_delete(storage: &MockServerStorage, body: &Map<String, Value>) -> HttpResponse {
    let removed = string_field(body, "id")
        .and_then(|id| storage.write().unwrap().vault.remove(id));

    match removed {
        Some(_) => success(json!({})),
        None => failure(&["Vault container not found"]),
    }
}

fn string_field<'a>(body: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}

fn success(data: Value) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "isSuccess": true,
        "errorMessages": [],
        "validationHasFailed": false,
        "validationFailures": [],
        "data": data
    }))
}

fn failure(messages: &[&str]) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "isSuccess": false,
        "errorMessages": messages,
        "validationHasFailed": false,
        "validationFailures": [],
        "data": null
    }))
}

fn validation_failure(failures: &[(&str, &str)]) -> HttpResponse {
    let failures: Vec<Value> = failures
        .iter()
        .map(|(key, message)| json!({ "key": key, "message": message }))
        .collect();

    HttpResponse::Ok().json(json!({
        "isSuccess": false,
        "errorMessages": [],
        "validationHasFailed": true,
        "validationFailures": failures,
        "data": null
    }))
}
