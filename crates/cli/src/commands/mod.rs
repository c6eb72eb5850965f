//! CLI command implementations.
//!
//! Every command opens the cart from the data directory, registers the
//! surfaces it shows with a [`ViewSynchronizer`], and returns the text to
//! print. Rendering happens through the store's listener, exactly as in the
//! browser front end.

pub mod cart;
pub mod checkout;

use std::sync::{Arc, Mutex, PoisonError};

use simple_cart_core::CartStore;
use simple_cart_core::MoneyFormat;
use simple_cart_core::view::{DeliveryPolicy, SurfaceDescriptor, SurfaceKind, ViewSynchronizer};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::render::TerminalSink;
use crate::storage::FileStorage;

/// An open cart plus the surfaces rendering it.
pub struct Session {
    store: CartStore<FileStorage>,
    view: Arc<Mutex<ViewSynchronizer<TerminalSink>>>,
}

impl Session {
    /// Open the cart in `config.data_dir` and render `kinds` once.
    pub fn open(config: &CliConfig, kinds: &[SurfaceKind]) -> Self {
        let storage = FileStorage::new(&config.data_dir);
        debug!(dir = %storage.dir().display(), "Opening cart");
        let mut store = CartStore::open(storage);

        let money = MoneyFormat::for_currency(config.currency);
        let mut sync = ViewSynchronizer::new(TerminalSink::default());
        for &kind in kinds {
            let mut descriptor = SurfaceDescriptor::for_kind(kind).with_money(money);
            if kind == SurfaceKind::Checkout {
                descriptor = descriptor.with_delivery(DeliveryPolicy::Fixed(config.delivery_fee));
            }
            sync.register(descriptor);
        }

        let view = Arc::new(Mutex::new(sync));
        store.subscribe(Box::new(Arc::clone(&view)));
        Self { store, view }
    }

    /// The cart store.
    pub const fn store(&mut self) -> &mut CartStore<FileStorage> {
        &mut self.store
    }

    /// Run `f` against the synchronizer.
    pub fn with_view<T>(&self, f: impl FnOnce(&mut ViewSynchronizer<TerminalSink>) -> T) -> T {
        let mut sync = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut sync)
    }

    /// Everything currently rendered.
    pub fn screen(&self) -> String {
        self.with_view(|sync| sync.sink().screen())
    }

    /// Convert a 1-based row number to a cart position.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart has no such row.
    pub fn position(&self, row: usize) -> Result<usize, CliError> {
        if row == 0 || row > self.store.cart().len() {
            return Err(CliError::NoSuchRow(row));
        }
        Ok(row - 1)
    }
}

/// Ask a yes/no question on the terminal. Anything but `y`/`yes` is no.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read or written.
pub async fn confirm(question: &str) -> Result<bool, CliError> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{question} [y/N] ").as_bytes())
        .await?;
    stdout.flush().await?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
