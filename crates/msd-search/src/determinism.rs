use msd_core::RngHandle;

/// RNG handle for one optimization run.
pub fn run_rng(master_seed: u64, run_index: usize) -> RngHandle {
    RngHandle::substream(master_seed, run_index as u64)
}
