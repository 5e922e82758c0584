//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::ServiceConfig;
use crate::error::Result;
use anyhow::Context;
use crate::pagination::{ListParams, Pager};
use crate::service::{BaseService, HttpListOperation, RawPage, ServiceRequest};
use crate::types::JsonValue;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing results to stdout
    pub async fn run(&self) -> anyhow::Result<()> {
        let mut stdout = std::io::stdout();
        self.run_to(&mut stdout).await
    }

    /// Run the CLI command, writing results to `out`
    pub async fn run_to<W: Write + Send>(&self, out: &mut W) -> anyhow::Result<()> {
        let config = self.load_config().with_context(|| match &self.cli.config {
            Some(path) => format!("loading config from {}", path.display()),
            None => format!("loading config for service '{}'", self.cli.service),
        })?;
        let service = Arc::new(BaseService::new(&config).context("building service client")?);

        match &self.cli.command {
            Commands::List {
                path,
                items,
                limit,
                filters,
                params,
                pages,
            } => {
                let mut list_params = ListParams::new();
                list_params.limit = *limit;
                for (key, value) in filters {
                    list_params = list_params.filter(key, value);
                }
                self.list(service, path, items, params, &list_params, *pages, out)
                    .await
                    .with_context(|| format!("listing {path}"))
            }
            Commands::Get { path, params } => self
                .get(&service, path, params, out)
                .await
                .with_context(|| format!("fetching {path}")),
        }
    }

    /// Config file if given, environment otherwise
    fn load_config(&self) -> Result<ServiceConfig> {
        match &self.cli.config {
            Some(path) => ServiceConfig::from_file(path),
            None => ServiceConfig::from_env(&self.cli.service),
        }
    }

    /// Page through a collection, printing one JSON line per item
    #[allow(clippy::too_many_arguments)]
    async fn list<W: Write + Send>(
        &self,
        service: Arc<BaseService>,
        path: &str,
        items_key: &str,
        path_params: &[(String, String)],
        list_params: &ListParams,
        max_pages: Option<usize>,
        out: &mut W,
    ) -> Result<()> {
        let mut operation = HttpListOperation::<RawPage>::new(service, path);
        for (key, value) in path_params {
            operation = operation.path_param(key, value);
        }

        let mut pager = Pager::new(operation, list_params, RawPage::items_at(items_key))?;
        let mut count = 0usize;

        while pager.has_next() && max_pages.map_or(true, |max| pager.pages_fetched() < max) {
            for item in pager.get_next().await? {
                writeln!(out, "{}", serde_json::to_string(&item)?)?;
                count += 1;
            }
        }
        out.flush()?;

        info!(
            "Listed {} items from {} in {} pages",
            count,
            path,
            pager.pages_fetched()
        );
        Ok(())
    }

    /// Fetch a single resource and pretty-print the body
    async fn get<W: Write + Send>(
        &self,
        service: &BaseService,
        path: &str,
        path_params: &[(String, String)],
        out: &mut W,
    ) -> Result<()> {
        let mut request = ServiceRequest::get(path);
        for (key, value) in path_params {
            request = request.path_param(key, value);
        }

        let response = service.execute::<JsonValue>(request).await?;
        writeln!(out, "{}", serde_json::to_string_pretty(&response.result)?)?;
        out.flush()?;
        Ok(())
    }
}
