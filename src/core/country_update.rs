//! Country-Code Updater: bulk-rewrites one address country code to another
//! across every lead in the organization.

use crate::core::cursor::PageCursor;
use crate::domain::model::Address;
use crate::domain::ports::CrmApi;
use crate::utils::error::Result;

const LEADS_QUERY: &str = "* sort:created";
const LEAD_FIELDS: &str = "id,addresses";

#[derive(Debug, Clone)]
pub struct CountryUpdateConfig {
    /// Uppercased, validated ISO alpha-2 code to replace.
    pub old_code: String,
    /// Uppercased, validated ISO alpha-2 code to replace it with.
    pub new_code: String,
    /// Without this the run is a dry run: reads and logs only, no writes.
    pub confirmed: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateSummary {
    pub leads_scanned: usize,
    pub leads_updated: usize,
}

pub struct CountryCodeUpdater<A: CrmApi> {
    api: A,
    config: CountryUpdateConfig,
}

impl<A: CrmApi> CountryCodeUpdater<A> {
    pub fn new(api: A, config: CountryUpdateConfig) -> Self {
        Self { api, config }
    }

    /// Walk all leads and rewrite matching address countries. Any API error
    /// terminates the run; there is no per-lead tolerance here.
    pub async fn run(&self) -> Result<UpdateSummary> {
        let mut summary = UpdateSummary::default();
        let mut cursor = PageCursor::new();
        let mut has_more = true;

        while has_more {
            let page = self
                .api
                .list_leads(LEADS_QUERY, cursor.skip(), LEAD_FIELDS)
                .await?;
            let page_len = page.data.len();

            for mut lead in page.data {
                summary.leads_scanned += 1;
                if rewrite_countries(
                    &mut lead.addresses,
                    &self.config.old_code,
                    &self.config.new_code,
                ) {
                    if self.config.confirmed {
                        self.api
                            .update_lead_addresses(&lead.id, &lead.addresses)
                            .await?;
                    }
                    tracing::info!("updated {}", lead.id);
                    summary.leads_updated += 1;
                }
            }

            // Address writes never change which leads the query matches, so
            // the cursor always moves past the whole page.
            cursor.advance(page_len, 0);
            has_more = page.has_more;
        }

        Ok(summary)
    }
}

/// Replace every address country equal to `old_code` with `new_code`,
/// leaving all other address fields untouched. Returns whether anything
/// changed.
pub fn rewrite_countries(addresses: &mut [Address], old_code: &str, new_code: &str) -> bool {
    let mut changed = false;
    for address in addresses.iter_mut() {
        if address.country == old_code {
            address.country = new_code.to_string();
            changed = true;
        }
    }
    changed
}
