// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;
pub mod statement;
pub mod classifier;
pub mod classification;
pub mod ledger;
pub mod trial_balance;
pub mod pipeline;
pub mod commands;
