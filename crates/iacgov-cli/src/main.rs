// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
//! Wires config, the rule engine, the optional LLM client, and all ten
//! agents into a sealed registry, then serves either transport.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use iacgov_agents::{
    CostAgent, DeployAgent, DriftAgent, ImpactAgent, ModuleAgent, NotificationAgent, OrchestratorAgent,
    RuleCategoryAgent,
};
use iacgov_config::GovHostConfig;
use iacgov_core::Token;
use iacgov_llm::{LlmClient, LlmClientConfig};
use iacgov_registry::{AgentRegistryBuilder, Dispatcher};
use iacgov_rules::RuleEngine;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    Http,
    Stdio,
}

#[derive(Parser, Debug)]
#[command(name = "iac-gov-host", version, about = "Infrastructure-as-Code governance agent host")]
struct Args {
    /// Which transport to serve requests over.
    #[arg(long = "transport", value_enum, default_value_t = Transport::Http)]
    transport: Transport,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = GovHostConfig::from_env().context("invalid configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .init();

    let dispatcher = build_dispatcher(&config)?;

    match args.transport {
        Transport::Http => serve_http(dispatcher, config).await,
        Transport::Stdio => serve_stdio(dispatcher).await,
    }
}

fn build_dispatcher(config: &GovHostConfig) -> Result<Dispatcher> {
    let engine = Arc::new(RuleEngine::with_seed_rules());

    let llm = if config.enable_llm {
        let llm_config = LlmClientConfig {
            endpoint: config.model_endpoint.clone(),
            model: config.model_name.clone(),
            timeout: config.model_timeout,
            max_tokens: config.model_max_tokens,
        };
        Some(Arc::new(LlmClient::new(llm_config, Token::default()).context("failed to build LLM client")?))
    } else {
        None
    };

    // The orchestrator fans out to the other nine agents by looking them up
    // in its own dispatcher, built over a registry that excludes the
    // orchestrator itself — there is nothing to re-enter, so the
    // dispatcher's visited-set cycle guard never has to fire for it. The
    // outer, HTTP/MCP-facing registry then adds the orchestrator on top of
    // a second copy of the same nine agents, so direct calls to any agent
    // (`POST /agent/policy`, MCP `tools/call` with `name: "policy"`, ...)
    // resolve without going through the orchestrator at all.
    let sub_registry = register_sub_agents(AgentRegistryBuilder::new(), &engine, &llm).build();
    let sub_dispatcher = Dispatcher::new(Arc::new(sub_registry));
    let orchestrator = OrchestratorAgent::new(sub_dispatcher, llm.clone());

    let registry = register_sub_agents(AgentRegistryBuilder::new(), &engine, &llm)
        .register(orchestrator)
        .with_default("orchestrator")
        .build();

    Ok(Dispatcher::new(Arc::new(registry)))
}

fn register_sub_agents(
    builder: AgentRegistryBuilder,
    engine: &Arc<RuleEngine>,
    llm: &Option<Arc<LlmClient>>,
) -> AgentRegistryBuilder {
    builder
        .register(RuleCategoryAgent::policy(engine.clone(), llm.clone()))
        .register(RuleCategoryAgent::security(engine.clone(), llm.clone()))
        .register(RuleCategoryAgent::compliance(engine.clone(), llm.clone()))
        .register(CostAgent::default())
        .register(DriftAgent::default())
        .register(ImpactAgent::default())
        .register(DeployAgent::default())
        .register(NotificationAgent::default())
        .register(ModuleAgent::new(engine.clone()))
}

async fn serve_http(dispatcher: Dispatcher, config: GovHostConfig) -> Result<()> {
    let port = config.port;
    let idle_timeout = config.http_idle_timeout;
    let state = Arc::new(iacgov_http::AppState::new(dispatcher, config));
    let app = iacgov_http::build_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind 0.0.0.0:{port}"))?;
    tracing::info!(port, "iac-gov-host listening (http transport)");

    iacgov_http::serve(app, listener, idle_timeout).await.context("http server error")
}

async fn serve_stdio(dispatcher: Dispatcher) -> Result<()> {
    tracing::info!("iac-gov-host ready (stdio transport)");
    iacgov_mcp::run(&dispatcher).await.context("stdio transport error")
}
