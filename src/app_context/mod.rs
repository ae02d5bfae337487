use crate::map::catalog::Catalog;
use crate::map::{Haversine, SharedOracle};
use crate::storage::interface::ISessionStorage;
use crate::storage::sessions::HashMapSessionsStorage;
use crate::storage::sockets::HashMapClientSocketsStorage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext<SS: ISessionStorage> {
    pub sessions: SS,
    pub sockets: HashMapClientSocketsStorage,
    /// Every location the server knows about, before region filtering.
    pub catalog: Arc<Catalog>,
}

pub fn init(catalog: Catalog) -> AppContext<HashMapSessionsStorage> {
    let oracle: SharedOracle = Arc::new(Haversine);
    init_with_oracle(catalog, oracle)
}

pub fn init_with_oracle(
    catalog: Catalog,
    oracle: SharedOracle,
) -> AppContext<HashMapSessionsStorage> {
    let sockets = HashMapClientSocketsStorage::default();
    AppContext {
        sessions: HashMapSessionsStorage::new(sockets.clone(), oracle),
        sockets,
        catalog: Arc::new(catalog),
    }
}
