use domain::{Reading, SudType};
use prometheus::Registry;
use seneye_metrics::{IngestCounters, READING_METRICS, ReadingCollector, encode_text};
use seneye_storage::{InMemoryReadingStore, ReadingStore};
use seneye_telemetry::IngestResult;
use std::sync::Arc;

fn office_reading() -> Reading {
    let mut reading = Reading::default();
    reading.version = "1.0.0".to_string();
    reading.sud.id = "AAAAABBBBBCCCCCDDDDDEEEEEFFFFF00".to_string();
    reading.sud.name = "Office".to_string();
    reading.sud.sud_type = SudType::Home;
    reading.sud.timestamp = 1609561222;
    reading.sud.data.temperature = 21.125;
    reading.sud.data.ph = 7.94;
    reading.sud.data.nh3 = 0.001;
    reading.sud.data.status.water = 1;
    reading
}

fn example_reading() -> Reading {
    let mut reading = Reading::default();
    reading.sud.id = "1234".to_string();
    reading.sud.name = "example".to_string();
    reading.sud.sud_type = SudType::Home;
    reading.sud.timestamp = 1610505992;
    reading.sud.data.status.water = 1;
    reading.sud.data.status.temperature = 1;
    reading.sud.data.temperature = 21.3;
    reading.sud.data.ph = 7.0;
    reading.sud.data.nh3 = 0.01;
    reading.sud.data.kelvin = 100.0;
    reading.sud.data.lux = 200.0;
    reading.sud.data.par = 300.0;
    reading
}

fn collector_with(readings: Vec<Reading>) -> ReadingCollector {
    let store = Arc::new(InMemoryReadingStore::new());
    for reading in readings {
        store.put(reading);
    }
    ReadingCollector::new(store).expect("collector")
}

#[test]
fn office_reading_emits_twelve_samples_with_device_timestamp() {
    let collector = collector_with(vec![office_reading()]);
    let samples = collector.collect_samples();
    assert_eq!(samples.len(), 12);

    let temperature = samples
        .iter()
        .find(|s| s.name == "temperature_celsius")
        .expect("temperature sample");
    assert_eq!(temperature.labels.id, "AAAAABBBBBCCCCCDDDDDEEEEEFFFFF00");
    assert_eq!(temperature.labels.name, "Office");
    assert_eq!(temperature.labels.sud_type, "home");
    assert_eq!(temperature.value, 21.125);
    assert_eq!(temperature.timestamp_ms, 1609561222000);

    assert!(samples.iter().all(|s| s.timestamp_ms == 1609561222000));
    let water = samples
        .iter()
        .find(|s| s.name == "seneye_status_water")
        .expect("water sample");
    assert_eq!(water.value, 1.0);
}

#[test]
fn samples_follow_catalog_order_per_device() {
    let collector = collector_with(vec![office_reading()]);
    let names: Vec<&str> = collector.collect_samples().iter().map(|s| s.name).collect();
    let expected: Vec<&str> = READING_METRICS.iter().map(|spec| spec.name).collect();
    assert_eq!(names, expected);
}

#[test]
fn devices_are_sorted_by_id() {
    let mut b = example_reading();
    b.sud.id = "B".to_string();
    let mut a = example_reading();
    a.sud.id = "A".to_string();
    let mut c = example_reading();
    c.sud.id = "C".to_string();
    let collector = collector_with(vec![b, c, a]);

    let ids: Vec<String> = collector
        .collect_samples()
        .chunks(READING_METRICS.len())
        .map(|chunk| chunk[0].labels.id.clone())
        .collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
}

#[test]
fn empty_store_emits_nothing() {
    let collector = collector_with(Vec::new());
    assert!(collector.collect_samples().is_empty());

    let registry = Registry::new();
    registry.register(Box::new(collector)).expect("register");
    assert_eq!(encode_text(&registry).expect("encode"), "");
}

#[test]
fn exposition_carries_labels_and_device_timestamp() {
    let registry = Registry::new();
    registry
        .register(Box::new(collector_with(vec![office_reading()])))
        .expect("register");
    let text = encode_text(&registry).expect("encode");

    assert!(text.contains("# TYPE temperature_celsius gauge\n"));
    assert!(text.contains(
        "temperature_celsius{id=\"AAAAABBBBBCCCCCDDDDDEEEEEFFFFF00\",name=\"Office\",sud_type=\"home\"} 21.125 1609561222000\n"
    ));
}

#[test]
fn exposition_matches_full_text() {
    let registry = Registry::new();
    registry
        .register(Box::new(collector_with(vec![example_reading()])))
        .expect("register");
    let text = encode_text(&registry).expect("encode");

    assert_eq!(
        text,
        r#"# HELP ammonia PPM Water NH3 free ammonia
# TYPE ammonia gauge
ammonia{id="1234",name="example",sud_type="home"} 0.01 1610505992000
# HELP light_kelvin Correlated Color Temperature of the light in degrees Kelvin.
# TYPE light_kelvin gauge
light_kelvin{id="1234",name="example",sud_type="home"} 100 1610505992000
# HELP light_lux Intensity of the light observed in the tank in lux.
# TYPE light_lux gauge
light_lux{id="1234",name="example",sud_type="home"} 200 1610505992000
# HELP light_par Photosynthetic active radiation, the light power between 400nm and 700nm.
# TYPE light_par gauge
light_par{id="1234",name="example",sud_type="home"} 300 1610505992000
# HELP ph Water pH
# TYPE ph gauge
ph{id="1234",name="example",sud_type="home"} 7 1610505992000
# HELP seneye_status_ammonia Ammonia (NH3) is 0 if the free ammonia is within limits, 1 otherwise.
# TYPE seneye_status_ammonia gauge
seneye_status_ammonia{id="1234",name="example",sud_type="home"} 0 1610505992000
# HELP seneye_status_kelvin Kelvin is 0 if the Kelvin measurement is within limits, 1 otherwise.
# TYPE seneye_status_kelvin gauge
seneye_status_kelvin{id="1234",name="example",sud_type="home"} 0 1610505992000
# HELP seneye_status_ph PH is 0 if the pH is within limits, 1 otherwise.
# TYPE seneye_status_ph gauge
seneye_status_ph{id="1234",name="example",sud_type="home"} 0 1610505992000
# HELP seneye_status_slide Slide is 0 if the slide is correctly installed and unexpired, 1 otherwise.
# TYPE seneye_status_slide gauge
seneye_status_slide{id="1234",name="example",sud_type="home"} 0 1610505992000
# HELP seneye_status_temperature Temperature is 0 if the temperature is within limits, 1 otherwise.
# TYPE seneye_status_temperature gauge
seneye_status_temperature{id="1234",name="example",sud_type="home"} 1 1610505992000
# HELP seneye_status_water Water is 1 if the SUD is submerged in water, 0 otherwise.
# TYPE seneye_status_water gauge
seneye_status_water{id="1234",name="example",sud_type="home"} 1 1610505992000
# HELP temperature_celsius Water temperature in celsius
# TYPE temperature_celsius gauge
temperature_celsius{id="1234",name="example",sud_type="home"} 21.3 1610505992000
"#
    );
}

#[test]
fn zero_device_timestamp_is_left_out_of_exposition() {
    let mut reading = Reading::default();
    reading.sud.id = "x".to_string();
    let collector = collector_with(vec![reading]);
    assert!(collector.collect_samples().iter().all(|s| s.timestamp_ms == 0));

    let registry = Registry::new();
    registry.register(Box::new(collector)).expect("register");
    let text = encode_text(&registry).expect("encode");
    assert!(text.contains("temperature_celsius{id=\"x\",name=\"\",sud_type=\"unknown\"} 0\n"));
}

#[test]
fn collect_reflects_later_puts() {
    let store = Arc::new(InMemoryReadingStore::new());
    let collector = ReadingCollector::new(store.clone()).expect("collector");
    assert!(collector.collect_samples().is_empty());

    store.put(office_reading());
    let mut newer = office_reading();
    newer.sud.data.temperature = 22.0;
    store.put(newer);

    let samples = collector.collect_samples();
    assert_eq!(samples.len(), 12);
    assert_eq!(samples[0].value, 22.0);
}

#[test]
fn ingest_counters_export_every_result() {
    let counters = IngestCounters::new().expect("counters");
    counters.record(IngestResult::Accepted);
    counters.record(IngestResult::UnknownDevice);
    counters.record(IngestResult::UnknownDevice);
    assert_eq!(counters.get(IngestResult::UnknownDevice), 2);
    assert_eq!(counters.total(), 3);

    let registry = Registry::new();
    counters.register(&registry).expect("register");
    let text = encode_text(&registry).expect("encode");

    assert!(text.contains("# TYPE seneye_lde_messages_total counter\n"));
    assert!(text.contains("seneye_lde_messages_total{result=\"accepted\"} 1\n"));
    assert!(text.contains("seneye_lde_messages_total{result=\"unknown_device\"} 2\n"));
    // 预置的标签即使从未计数也会导出
    for result in IngestResult::ALL {
        assert!(text.contains(&format!("result=\"{}\"", result.as_str())), "{result:?}");
    }
    assert!(text.contains("seneye_lde_messages_total{result=\"signature_mismatch\"} 0\n"));
}
