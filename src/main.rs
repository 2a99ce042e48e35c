use events_globe::{GlobeConfig, flow};

fn main() -> anyhow::Result<()> {
    flow::run(GlobeConfig::default())
}
