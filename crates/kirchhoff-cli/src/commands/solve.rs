//! The `kirchhoff solve` command.

use anyhow::Result;

use kirchhoff_core::solver::SolverRegistry;

pub fn execute(params: Vec<(String, f64)>, family: String) -> Result<()> {
    let solvers = SolverRegistry::default();
    let answer = solvers.solve(&super::assignment(params), &family)?;
    println!("{} = {:.4} {}", answer.quantity, answer.value, answer.unit);
    Ok(())
}
