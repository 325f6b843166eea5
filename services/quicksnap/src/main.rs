// Copyright 2022 QuickSnap Developers.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! QuickSnap command line client.
#![deny(unsafe_code)]
#![warn(missing_docs)]

use ethers::types::Address;
use quicksnap_aggregator as aggregator;
use quicksnap_config::cli::{load_config, setup_logger, Opts};
use quicksnap_context::IncentiveContext;
use quicksnap_types::{
    GaugeTarget, NormalizedIncentive, ProjectTag, ProposalSummary,
};
use serde::Serialize;
use structopt::StructOpt;

/// Command line arguments.
#[derive(Debug, StructOpt)]
#[structopt(name = "quicksnap")]
struct Cli {
    #[structopt(flatten)]
    opts: Opts,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Prints the incentive period containing now, or `--at`.
    Period {
        /// Unix timestamp, in seconds.
        #[structopt(long)]
        at: Option<u64>,
    },
    /// Lists the gauges of every enabled project with their incentives.
    Gauges {
        /// Only this project (CURVE, FRAX or ANGLE).
        #[structopt(long, parse(try_from_str = parse_project))]
        project: Option<ProjectTag>,
    },
    /// Shows one gauge.
    Gauge {
        /// The project of the gauge (CURVE, FRAX or ANGLE).
        #[structopt(long, parse(try_from_str = parse_project))]
        project: ProjectTag,
        /// The gauge address.
        gauge: Address,
    },
    /// Shows the incentives of a snapshot proposal, per choice.
    Proposal {
        /// The proposal id.
        id: String,
    },
    /// Lists the snapshot incentives active right now.
    Active,
    /// Lists the claimable rewards of an account.
    Rewards {
        /// The account, defaults to the signer.
        account: Option<Address>,
    },
    /// Approves a spender for an unlimited amount of a token.
    Approve {
        /// The token.
        token: Address,
        /// The spender.
        spender: Address,
    },
    /// Deposits an incentive for a gauge.
    AddReward {
        /// The project of the gauge (CURVE, FRAX or ANGLE).
        #[structopt(long, parse(try_from_str = parse_project))]
        project: ProjectTag,
        /// The gauge address.
        #[structopt(long)]
        gauge: Address,
        /// The reward token.
        #[structopt(long)]
        token: Address,
        /// Amount, in whole tokens.
        #[structopt(long)]
        amount: f64,
    },
    /// Deposits an incentive for a choice of a snapshot proposal.
    AddSnapshotReward {
        /// The proposal id.
        #[structopt(long)]
        proposal: String,
        /// 1-based choice index.
        #[structopt(long)]
        option: u32,
        /// The reward token.
        #[structopt(long)]
        token: Address,
        /// Amount, in whole tokens.
        #[structopt(long)]
        amount: f64,
        /// Incentive window start, unix seconds.
        #[structopt(long)]
        start: u64,
        /// Incentive window end, unix seconds.
        #[structopt(long)]
        end: u64,
    },
    /// Claims every reward of the signer.
    ClaimAll,
}

fn parse_project(s: &str) -> Result<ProjectTag, serde_json::Error> {
    serde_json::from_value(serde_json::Value::String(s.to_uppercase()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProposalIncentives {
    proposal: ProposalSummary,
    incentives: Vec<NormalizedIncentive>,
    totals: Vec<aggregator::choice::ChoiceTotal>,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn gauge_target(
    ctx: &IncentiveContext,
    project: ProjectTag,
    gauge: Address,
) -> anyhow::Result<GaugeTarget> {
    let config = ctx
        .project(project)
        .filter(|p| p.enabled)
        .ok_or_else(|| anyhow::anyhow!("project {project} is not enabled"))?;
    Ok(GaugeTarget {
        project,
        bribe: config.bribe,
        controller: config.gauge_controller,
        gauge,
    })
}

async fn run(ctx: &IncentiveContext, command: Command) -> anyhow::Result<()> {
    // one timestamp per run: every gauge is read for the same period.
    let now = aggregator::unix_now();
    match command {
        Command::Period { at } => {
            print_json(&aggregator::compute_active_period(at.unwrap_or(now)))
        }
        Command::Gauges { project } => {
            let period = aggregator::compute_active_period(now);
            let mut gauges = Vec::new();
            for config in ctx
                .projects()
                .iter()
                .filter(|p| p.enabled && project.map_or(true, |t| t == p.tag))
            {
                gauges.extend(
                    aggregator::project_gauges(ctx, config, period).await,
                );
            }
            tracing::info!(%period, gauges = gauges.len(), "gauges read");
            print_json(&gauges)
        }
        Command::Gauge { project, gauge } => {
            let target = gauge_target(ctx, project, gauge)?;
            let period = aggregator::compute_active_period(now);
            let info = aggregator::gauge::try_get_gauge_info(
                ctx, &target, period,
            )
            .await?;
            print_json(&info)
        }
        Command::Proposal { id } => {
            let proposal = ctx
                .indexer()
                .proposal(&id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("unknown proposal {id}"))?;
            let incentives = aggregator::incentives_for_proposal(
                ctx,
                &proposal.id,
                &proposal.choices,
            )
            .await;
            let totals = aggregator::sum_by_choice(&incentives);
            print_json(&ProposalIncentives {
                proposal,
                incentives,
                totals,
            })
        }
        Command::Active => {
            print_json(&aggregator::active_snapshot_incentives(ctx, now).await)
        }
        Command::Rewards { account } => {
            let account = match account {
                Some(account) => account,
                None => ctx.submitter()?.sender(),
            };
            print_json(&aggregator::get_rewards(ctx, account).await)
        }
        Command::Approve { token, spender } => {
            if !aggregator::approve_token(ctx, token, spender).await {
                anyhow::bail!("approval of {token:?} failed");
            }
            Ok(())
        }
        Command::AddReward {
            project,
            gauge,
            token,
            amount,
        } => {
            let target = gauge_target(ctx, project, gauge)?;
            let tx_hash =
                aggregator::add_reward_amount(ctx, &target, token, amount)
                    .await?;
            print_json(&tx_hash)
        }
        Command::AddSnapshotReward {
            proposal,
            option,
            token,
            amount,
            start,
            end,
        } => {
            let space = ctx
                .indexer()
                .proposal(&proposal)
                .await?
                .and_then(|p| p.space)
                .map(|space| space.id);
            let request = aggregator::SnapshotIncentiveRequest {
                space,
                proposal,
                option,
                token,
                amount,
                start,
                end,
            };
            let tx_hash =
                aggregator::add_snapshot_reward_amount(ctx, &request).await?;
            print_json(&tx_hash)
        }
        Command::ClaimAll => {
            let account = ctx.submitter()?.sender();
            let claims: Vec<_> = aggregator::get_rewards(ctx, account)
                .await
                .rewards
                .into_iter()
                .map(|reward| reward.claim_data)
                .collect();
            let tx_hash = aggregator::claim_all_rewards(ctx, &claims).await?;
            print_json(&tx_hash)
        }
    }
}

/// The main entry point of the client.
///
/// # Arguments
///
/// * `args` - The command line arguments.
#[paw::main]
#[tokio::main]
async fn main(args: Cli) -> anyhow::Result<()> {
    setup_logger(args.opts.verbose)?;
    match dotenv::dotenv() {
        Ok(_) => {
            tracing::trace!("Loaded .env file");
        }
        Err(e) => {
            tracing::warn!("Failed to load .env file: {}", e);
        }
    }

    let config = load_config(args.opts.config_dir.clone())?;
    // The context holds the providers, the price oracle and the indexer,
    // it is shared by every flow of the run.
    let ctx = IncentiveContext::new(&config)?;
    tracing::debug!(?ctx, "context ready");

    run(&ctx, args.command).await
}
