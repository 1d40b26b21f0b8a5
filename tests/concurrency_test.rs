//! Registration racing against resolution

use async_trait::async_trait;
use sqlopen::Resolver;
use sqlopen::openers::{Connection, DriverError, Opener, Registry};
use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use url::Url;

#[derive(Debug)]
struct Numbered {
    id: String,
}

#[async_trait]
impl Connection for Numbered {
    fn driver(&self) -> &str {
        &self.id
    }

    async fn ping(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Opener `n` claims scheme `sn`
struct NumberedOpener {
    id: String,
    scheme: String,
}

impl NumberedOpener {
    fn new(n: usize) -> Arc<dyn Opener> {
        Arc::new(Self {
            id: format!("opener-{n}"),
            scheme: format!("s{n}"),
        })
    }
}

#[async_trait]
impl Opener for NumberedOpener {
    fn id(&self) -> &str {
        &self.id
    }

    fn can_open(&self, url: &Url) -> bool {
        url.scheme() == self.scheme
    }

    async fn open(&self, _url: &Url) -> Result<Box<dyn Connection>, DriverError> {
        Ok(Box::new(Numbered {
            id: self.id.clone(),
        }))
    }
}

const OPENERS: usize = 32;
const LOOKUPS: usize = 64;

#[test]
fn test_parallel_registration_loses_nothing() {
    let registry = Arc::new(Registry::new());

    let handles: Vec<_> = (0..OPENERS)
        .map(|n| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.register(NumberedOpener::new(n)))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let listed: HashSet<String> = registry.list().into_iter().collect();
    let expected: HashSet<String> = (0..OPENERS).map(|n| format!("opener-{n}")).collect();
    assert_eq!(listed, expected);
}

#[test]
fn test_racing_duplicate_registration_admits_one() {
    let registry = Arc::new(Registry::new());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.try_register(NumberedOpener::new(0)).is_ok())
        })
        .collect();
    let admitted = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(admitted, 1);
    assert_eq!(registry.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_register_and_open_interleaved() {
    let registry = Arc::new(Registry::new());
    let resolver = Arc::new(Resolver::new(Arc::clone(&registry)));

    let mut registrations = Vec::new();
    for n in 0..OPENERS {
        let registry = Arc::clone(&registry);
        registrations.push(tokio::spawn(async move {
            registry.register(NumberedOpener::new(n));
        }));
    }

    let mut lookups = Vec::new();
    for i in 0..LOOKUPS {
        let resolver = Arc::clone(&resolver);
        // every other lookup targets a scheme nobody registers
        let n = if i % 2 == 0 { i % OPENERS } else { OPENERS + i };
        lookups.push(tokio::spawn(async move {
            (n, resolver.open(&format!("s{n}://db")).await)
        }));
    }

    for handle in registrations {
        handle.await.unwrap();
    }
    for handle in lookups {
        let (n, result) = handle.await.unwrap();
        match result {
            Ok(conn) => {
                assert!(n < OPENERS);
                assert_eq!(conn.driver(), format!("opener-{n}"));
            }
            Err(err) => assert!(err.is_unsupported_scheme(), "{err}"),
        }
    }

    assert_eq!(registry.len(), OPENERS);

    let snapshot = resolver.metrics().snapshot();
    assert_eq!(snapshot.opens_attempted, LOOKUPS as u64);
    assert_eq!(
        snapshot.opens_succeeded + snapshot.unsupported_scheme,
        LOOKUPS as u64
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reset_during_lookups_never_tears() {
    let registry = Arc::new(Registry::new());
    let resolver = Arc::new(Resolver::new(Arc::clone(&registry)));

    let writer = {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            for _ in 0..50 {
                registry.register(NumberedOpener::new(1));
                tokio::task::yield_now().await;
                registry.reset();
            }
        })
    };

    let mut readers = Vec::new();
    for _ in 0..8 {
        let resolver = Arc::clone(&resolver);
        readers.push(tokio::spawn(async move {
            for _ in 0..50 {
                match resolver.open("s1://db").await {
                    Ok(conn) => assert_eq!(conn.driver(), "opener-1"),
                    Err(err) => assert!(err.is_unsupported_scheme(), "{err}"),
                }
                tokio::task::yield_now().await;
            }
        }));
    }

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }
    assert!(registry.is_empty());
}
