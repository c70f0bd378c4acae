/// Integration test harness
mod container_flow;
