mod concurrency;
mod convergence;
mod local_signer;
