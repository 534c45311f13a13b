use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use log::info;
use portfolio_construction::{
    AccumulativeConfig, AccumulativeConstructor, AllocatorError, EqualWeightingConstructor,
    PercentMaterializer,
};
use trading::traits::data_feed::DataFeed;
use trading::{PortfolioConstructor, SecurityChanges};

mod args;
mod feed;

use args::{Args, Model};
use feed::{RandomAlpha, RandomFeed};

fn build_model(args: &Args) -> Result<Box<dyn PortfolioConstructor<Error = AllocatorError>>> {
    Ok(match args.model {
        Model::Accumulative => {
            let mut config = match &args.config {
                Some(path) => AccumulativeConfig::from_json_file(path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => AccumulativeConfig::default(),
            };
            if let Some(percent) = args.percent {
                config = AccumulativeConfig::new(percent);
            }
            info!("Accumulative model, step {:.4}", config.percent());
            Box::new(AccumulativeConstructor::new(config))
        }
        Model::EqualWeighting => {
            info!("Equal-weighting model");
            Box::new(EqualWeightingConstructor::default())
        }
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut model = build_model(&args)?;
    let mut feed = RandomFeed::new(args.instruments, 100.0);
    let alpha = RandomAlpha::new(args.insight_rate);
    let mut materializer = PercentMaterializer::new(args.portfolio_value);
    let mut universe = feed.instruments().to_vec();

    let start = Utc::now();
    for step in 0..args.steps {
        let now = start + Duration::minutes(step as i64);

        if let Some(updates) = feed.next_prices(now) {
            for update in &updates {
                materializer.on_price(update);
            }
        }

        if args.remove_at == Some(step) {
            if let Some(removed) = universe.pop() {
                model.on_securities_changed(&SecurityChanges::removed(vec![removed]));
            }
        }

        let insights = alpha.generate(now, &universe);
        let batch = model.create_targets(now, insights, &materializer)?;
        for target in batch.targets() {
            info!(
                "[step {}] target {} -> {:.4}",
                step,
                target.instrument_id(),
                target.quantity()
            );
        }
        for instrument_id in batch.failed() {
            info!("[step {}] could not size {}", step, instrument_id);
        }
    }

    Ok(())
}
