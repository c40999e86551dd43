mod client;
mod deprecation;
mod provider;
mod scanner;
mod types;


pub use provider::AzureDevOpsProvider;
