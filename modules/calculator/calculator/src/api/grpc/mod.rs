mod server;

pub use server::{CalculatorServiceImpl, FibonacciResponseStream};
