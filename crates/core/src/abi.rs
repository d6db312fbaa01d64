//! Scheduler contract ABI.
//!
//! Both contract generations expose `getPlans()` and `execBribe(bytes32,bytes32)`;
//! they differ only in the shape of the `Plan` tuple. The `rpc` bindings give
//! each interface an `IBriber::new(address, provider)` instance for reads.

#![allow(missing_docs)]

/// First generation: plans keyed by `(hhBriber, gauge, token)`.
pub mod v1 {
    alloy::sol! {
        #[sol(rpc)]
        interface IBriber {
            struct Plan {
                address hhBriber;
                address gauge;
                address token;
                uint256 amount;
                uint256 interval;
                uint256 nextExec;
                uint256 remainingEpochs;
            }

            function getPlans() external view returns (Plan[] memory);

            function execBribe(bytes32 key, bytes32 proposal) external;
        }
    }
}

/// Second generation: plans also carry `createdAt`, `canSkip` and `isFixed`.
pub mod v2 {
    alloy::sol! {
        #[sol(rpc)]
        interface IBriber {
            struct Plan {
                address hhBriber;
                address gauge;
                address token;
                uint256 amount;
                uint256 interval;
                uint256 nextExec;
                uint256 remainingEpochs;
                uint256 createdAt;
                bool canSkip;
                bool isFixed;
            }

            function getPlans() external view returns (Plan[] memory);

            function execBribe(bytes32 key, bytes32 proposal) external;
        }
    }
}
