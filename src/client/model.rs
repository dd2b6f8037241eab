mod event;
pub use event::*;

mod post;
pub use post::*;

mod user;
pub use user::*;

use lru::LruCache;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use std::{
    any::Any,
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// The synthetic role every event implicitly carries.
pub const EVERYONE: &str = "everyone";

pub(crate) type ObjectMap<T> = LruCache<String, Arc<T>>;
static CACHES: Lazy<Mutex<HashMap<&'static str, Arc<Mutex<Box<dyn Any + Send + Sync>>>>>> = Lazy::new(Mutex::default);

pub(crate) fn obtain_map_cache<T: Object + 'static>() -> Arc<Mutex<Box<dyn Any + Send + Sync>>> {
    let mut caches = CACHES.lock().unwrap();
    Arc::clone(
        caches
            .entry(T::QUERY_PATH)
            .or_insert_with(|| Arc::new(Mutex::new(Box::new(ObjectMap::<T>::new(64.try_into().unwrap()))))),
    )
}

/// A record the store serves by identifier.
pub trait Object: Clone + DeserializeOwned + Send + Sync {
    const QUERY_PATH: &'static str;

    fn id(&self) -> &str;
}
