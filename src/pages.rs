//! Views over engine state, the session capability and the HTTP API client.
//!
//! Views read an [`EngineSnapshot`](crate::forms::EngineSnapshot) and never
//! change engine state themselves.
//!
//! ```rust,no_run
//! use formflow::pages::{FormApiClient, Session, User};
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), formflow::pages::ApiError> {
//! let client = FormApiClient::new("http://localhost:3000", Duration::from_secs(10))?;
//! let session: Session = client.sign_in(User::new("21CS042", "Asha")).await?;
//! let form = client.fetch_form(&session).await?;
//! println!("{}", form.form_title);
//! # Ok(())
//! # }
//! ```

pub use formflow_pages::*;
