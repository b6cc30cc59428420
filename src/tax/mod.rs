pub mod il;
pub mod income;
pub mod levies;
pub mod options;
pub mod portfolio;
pub mod result;
pub mod rsu;

pub use il::{TaxBracket, TaxYear};
pub use income::{equity_income_tax, marginal_rate, progressive_tax, EquityIncomeTax};
pub use levies::{bituah_leumi, capital_gains_tax, health_insurance, CapitalGainsTax};
pub use options::{calculate_option_result, detect_route, TaxRoute};
pub use portfolio::{calculate, Simulation};
pub use result::{CalculationResult, PackageResult, TaxBreakdown, Totals};
pub use rsu::calculate_rsu_result;
