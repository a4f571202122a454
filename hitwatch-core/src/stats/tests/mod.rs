mod alerter_tests;
mod top_k_tests;
