//! End-to-end tests against the public server surface

use std::time::{Duration, Instant};

use chrono::Utc;
use tagsim::address_space::{ANALOG_ITEM, CASING_HEIGHT, RAMP_ITEM, SINE_ITEM, VENDOR_ITEM};
use tagsim::tagsim_types::{PropertyId, Quality, VariantValue};
use tagsim::{DataServer, Error, ItemWrite, ServerConfig, StatusCode};

fn fast_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.simulation.tick_period_ms = 25;
    config
}

#[tokio::test]
async fn test_simulation_updates_and_shutdown() {
    let server = DataServer::initialize(fast_config()).unwrap();
    let ramp = server.registry().lookup(RAMP_ITEM).unwrap();
    let sine = server.registry().lookup(SINE_ITEM).unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;

    let state = server.read_value(ramp).unwrap();
    assert!(state.value.as_i64().unwrap() >= 2);
    assert_eq!(state.quality, Quality::Good);

    let sine_value = server.read_value(sine).unwrap().value.as_f64().unwrap();
    assert!((-1.0..=1.0).contains(&sine_value));

    let started = Instant::now();
    server.shutdown().await;
    assert!(started.elapsed() < Duration::from_secs(5));

    let frozen = server.read_value(ramp).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(server.read_value(ramp).unwrap(), frozen);
}

#[tokio::test]
async fn test_property_requests() {
    let mut config = fast_config();
    config.simulation.enabled = false;
    let server = DataServer::initialize(config).unwrap();

    let analog = server.registry().lookup(ANALOG_ITEM).unwrap();
    let ids = server.query_properties(analog).unwrap();
    assert_eq!(ids.len(), 2);
    let values: Vec<_> = ids
        .iter()
        .map(|id| server.get_property_value(analog, *id).unwrap())
        .collect();
    assert_eq!(values, vec![VariantValue::F64(40.86), VariantValue::F64(92.67)]);

    let vendor = server.registry().lookup(VENDOR_ITEM).unwrap();
    assert_eq!(
        server.get_property_value(vendor, CASING_HEIGHT).unwrap(),
        VariantValue::F64(25.45)
    );
    assert!(matches!(
        server.get_property_value(vendor, PropertyId(1)),
        Err(Error::InvalidPropertyId { .. })
    ));

    // Catalog default differs from the item's own value
    assert_eq!(
        server.catalog().get(CASING_HEIGHT).unwrap().default_value,
        VariantValue::F64(25.34)
    );
}

#[tokio::test]
async fn test_writes_alongside_simulation() {
    let server = DataServer::initialize(fast_config()).unwrap();
    let vendor = server.registry().lookup(VENDOR_ITEM).unwrap();

    let writer = {
        let dispatcher = server.dispatcher().clone();
        tokio::spawn(async move {
            for i in 0..50 {
                let stamp = Utc::now();
                let statuses = dispatcher.write_items(&[ItemWrite::new(vendor)
                    .value(i)
                    .quality(Quality::Good)
                    .timestamp(stamp)]);
                assert_eq!(statuses, vec![StatusCode::Good]);
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
    };
    writer.await.unwrap();

    assert_eq!(server.read_value(vendor).unwrap().value, VariantValue::I32(49));

    let statuses = server.write_items(&[ItemWrite::new(vendor).quality(Quality::Bad)]);
    assert_eq!(statuses, vec![StatusCode::Good]);
    let state = server.read_value(vendor).unwrap();
    assert_eq!(state.value, VariantValue::I32(49));
    assert_eq!(state.quality, Quality::Bad);

    server.shutdown().await;
}
