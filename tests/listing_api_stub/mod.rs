use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub struct StubConfig {
    pub cars: Vec<Value>,
    pub total_pages: u32,
    pub fail_listing: bool,
}

/// Stand-in for the marketplace API: serves `/v1/car_lists/` and records every query string.
pub struct ListingApiStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ListingApiStub {
    pub fn spawn(config: StubConfig) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start listing api stub");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}/v1");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let url = request.url().to_string();
                let (path, query) = url.split_once('?').unwrap_or((url.as_str(), ""));
                if path != "/v1/car_lists/" {
                    let _ = request.respond(
                        tiny_http::Response::from_string("not found").with_status_code(404),
                    );
                    continue;
                }
                recorded.lock().unwrap().push(query.to_string());

                let params: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
                    .into_owned()
                    .collect();
                let param = |key: &str| params.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone());

                let body = if param("all").as_deref() == Some("true") {
                    json!({ "results": config.cars })
                } else if let Some(car_id) = param("car_id") {
                    let matches: Vec<&Value> = config
                        .cars
                        .iter()
                        .filter(|c| c["car_id"].to_string().trim_matches('"') == car_id)
                        .collect();
                    json!({ "results": matches })
                } else if config.fail_listing {
                    let _ = request.respond(
                        tiny_http::Response::from_string("upstream exploded").with_status_code(500),
                    );
                    continue;
                } else {
                    json!({ "results": config.cars, "total_pages": config.total_pages })
                };

                let header = tiny_http::Header::from_bytes("Content-Type", "application/json")
                    .expect("content type header");
                let _ = request.respond(
                    tiny_http::Response::from_string(body.to_string()).with_header(header),
                );
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for ListingApiStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

pub fn sample_cars() -> Vec<Value> {
    vec![
        json!({
            "car_id": 1,
            "brand": "VW",
            "model": "Golf",
            "price": 18900,
            "mileage": 45000,
            "power_ps": 110,
            "power_kw": 81,
            "fuel_type": "Benzin",
            "body_style": "Limousine",
            "gear_type": "Manuell",
            "translation": "Manuell",
            "engine_size": 1598,
            "weight": "0",
            "energy_class": "nan",
            "year_of_registration": "2015-06-01",
            "year_of_construction": "2014-12-01",
            "car_description": "Gepflegtes Fahrzeug",
            "features_standard": "ABS, ESP, Klimaanlage",
            "features_extra": "None",
            "car_pictures": [
                "https://img.example/p0.jpg",
                "https://img.example/p1.jpg",
                "https://img.example/p2.jpg",
                "https://img.example/p3.jpg"
            ]
        }),
        json!({
            "car_id": 2,
            "brand": "Audi",
            "model": "A4",
            "price": 24500,
            "mileage": 200000,
            "power_ps": 150,
            "fuel_type": "Diesel",
            "body_style": "Kombi",
            "translation": "Automat",
            "year_of_registration": "2010-01-01",
            "car_pictures": ["https://img.example/a0.jpg"]
        }),
        json!({
            "car_id": 3,
            "brand": "VW",
            "model": "Polo",
            "price": 9900,
            "mileage": 0,
            "power_ps": 75,
            "fuel_type": "Benzin",
            "body_style": "Kleinwagen",
            "translation": "Manuell",
            "year_of_registration": "2020-03-01",
            "car_pictures": []
        }),
    ]
}
