//! Deploy tooling for the lending core.

use odra::casper_types::U256;
use odra::host::HostEnv;
use odra::prelude::Addressable;

use odra_cli::{
    deploy::DeployScript,
    scenario::{Args, Error, Scenario, ScenarioMetadata},
    CommandArg, ContractProvider, DeployedContractsContainer, DeployerExt, OdraCli,
};

use lending_core::auditor::{Auditor, AuditorInitArgs};
use lending_core::oracle::{MockPriceFeed, MockPriceFeedInitArgs};
use lending_core::state::DEFAULT_LIQUIDATION_INCENTIVE;

/// Deploys a price feed and the auditor wired to it.
pub struct AuditorDeployScript;

impl DeployScript for AuditorDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer,
    ) -> Result<(), odra_cli::deploy::Error> {
        let admin = env.caller();

        let feed = MockPriceFeed::load_or_deploy(
            env,
            MockPriceFeedInitArgs { admin },
            container,
            150_000_000_000,
        )?;
        println!("Price feed deployed at: {:?}", feed.address());

        let auditor = Auditor::load_or_deploy(
            env,
            AuditorInitArgs {
                admin,
                oracle: feed.address().clone(),
                liquidation_incentive: U256::from(DEFAULT_LIQUIDATION_INCENTIVE),
            },
            container,
            250_000_000_000,
        )?;
        println!("Auditor deployed at: {:?}", auditor.address());

        Ok(())
    }
}

/// Prints the auditor configuration and listed markets.
pub struct AuditorConfigScenario;

impl Scenario for AuditorConfigScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        _args: Args,
    ) -> Result<(), Error> {
        let auditor = container.contract_ref::<Auditor>(env)?;

        println!("Admin: {:?}", auditor.admin());
        println!("Oracle: {:?}", auditor.oracle());
        println!("Liquidation incentive: {}", auditor.liquidation_incentive());
        for market in auditor.all_markets() {
            let info = auditor.market_info(market);
            println!(
                "Market {:?}: adjust factor {}, decimals {}",
                market, info.adjust_factor, info.decimals
            );
        }

        Ok(())
    }
}

impl ScenarioMetadata for AuditorConfigScenario {
    const NAME: &'static str = "auditor-config";
    const DESCRIPTION: &'static str = "Prints the auditor configuration and listed markets";
}

pub fn main() {
    OdraCli::new()
        .about("CLI tool for the lending core")
        .deploy(AuditorDeployScript)
        .contract::<Auditor>()
        .contract::<MockPriceFeed>()
        .scenario(AuditorConfigScenario)
        .build()
        .run();
}
