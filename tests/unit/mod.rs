/// Unit test harness
mod domain_tests;
