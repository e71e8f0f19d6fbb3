//! Service wiring: invoice store, listing cache and the actions over them.

use std::sync::Arc;

use anyhow::Context;

use invoicedesk_infra::{
    DeleteMode, InMemoryInvoiceStore, InvoiceStore, ListingCache, PostgresInvoiceStore, Settings,
};

use crate::actions::{Clock, InvoiceActions};

pub type Actions = InvoiceActions<Arc<dyn InvoiceStore>, Arc<ListingCache>>;

/// Shared state handed to every handler through an `Extension`.
pub struct AppServices {
    pub actions: Actions,
    pub store: Arc<dyn InvoiceStore>,
    pub listing: Arc<ListingCache>,
}

impl AppServices {
    pub fn new(store: Arc<dyn InvoiceStore>, delete_mode: DeleteMode) -> Self {
        let listing = Arc::new(ListingCache::new());
        let actions = InvoiceActions::new(store.clone(), listing.clone())
            .with_delete_mode(delete_mode);
        Self {
            actions,
            store,
            listing,
        }
    }

    pub fn in_memory(delete_mode: DeleteMode) -> Self {
        Self::new(Arc::new(InMemoryInvoiceStore::new()), delete_mode)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.actions = self.actions.with_clock(clock);
        self
    }

    /// Postgres when `DATABASE_URL` is set, in-memory otherwise.
    pub async fn build(settings: &Settings) -> anyhow::Result<Self> {
        let store: Arc<dyn InvoiceStore> = match &settings.database_url {
            Some(url) => {
                let pg = PostgresInvoiceStore::connect(url)
                    .await
                    .context("connecting to DATABASE_URL")?;
                pg.ensure_schema()
                    .await
                    .context("creating invoices table")?;
                tracing::info!("using postgres invoice store");
                Arc::new(pg)
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory invoice store");
                Arc::new(InMemoryInvoiceStore::new())
            }
        };

        if settings.delete_mode == DeleteMode::ShortCircuit {
            tracing::warn!("invoice deletion is disabled");
        }

        Ok(Self::new(store, settings.delete_mode))
    }
}
