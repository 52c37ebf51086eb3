//! Command category table
//!
//! Maps each semantic category to the closed set of raw command names
//! it covers. The table is data, not code: new commands shipped by
//! upstream engine versions are added here without touching sampling
//! or orchestration logic. Commands outside every category still count
//! toward the grand total, which comes from the server's own aggregate
//! counter.

/// A named, fixed group of raw command names
#[derive(Debug, Clone, Copy)]
pub struct CommandCategory {
    /// Column name in the output row (e.g. "HashBasedCmds")
    pub name: &'static str,
    /// Raw command names belonging to this category
    pub commands: &'static [&'static str],
}

/// Default category table, in output-column order
pub const DEFAULT_CATEGORIES: &[CommandCategory] = &[
    CommandCategory {
        name: "BitmapBasedCmds",
        commands: &[
            "bitcount",
            "bitfield",
            "bitfield_ro",
            "bitop",
            "bitpos",
            "getbit",
            "setbit",
        ],
    },
    CommandCategory {
        name: "ClusterBasedCmds",
        commands: &["asking", "cluster"],
    },
    CommandCategory {
        name: "EvalBasedCmds",
        commands: &[
            "eval",
            "evalsha",
            "evalsha_ro",
            "eval_ro",
            "fcall",
            "fcall_ro",
            "function",
            "script",
        ],
    },
    CommandCategory {
        name: "GeoSpatialBasedCmds",
        commands: &[
            "geoadd",
            "geodist",
            "geohash",
            "geopos",
            "georadius",
            "georadiusbymember",
            "georadiusbymember_ro",
            "georadius_ro",
            "geosearch",
            "geosearchstore",
        ],
    },
    CommandCategory {
        name: "HashBasedCmds",
        commands: &[
            "hdel",
            "hexists",
            "hget",
            "hgetall",
            "hincrby",
            "hincrbyfloat",
            "hkeys",
            "hlen",
            "hmget",
            "hmset",
            "hrandfield",
            "hscan",
            "hset",
            "hsetnx",
            "hstrlen",
            "hvals",
        ],
    },
    CommandCategory {
        name: "HyperLogLogBasedCmds",
        commands: &["pfadd", "pfcount", "pfdebug", "pfmerge", "pfselftest"],
    },
    CommandCategory {
        name: "KeyBasedCmds",
        commands: &[
            "copy",
            "del",
            "dump",
            "exists",
            "expire",
            "expireat",
            "expiretime",
            "keys",
            "migrate",
            "move",
            "object",
            "persist",
            "pexpire",
            "pexpireat",
            "pexpiretime",
            "pttl",
            "randomkey",
            "rename",
            "renamenx",
            "restore",
            "scan",
            "sort",
            "sort_ro",
            "touch",
            "ttl",
            "type",
            "unlink",
            "wait",
        ],
    },
    CommandCategory {
        name: "ListBasedCmds",
        commands: &[
            "blmove",
            "blmpop",
            "blpop",
            "brpop",
            "brpoplpush",
            "lindex",
            "linsert",
            "llen",
            "lmove",
            "lmpop",
            "lpop",
            "lpos",
            "lpush",
            "lpushx",
            "lrange",
            "lrem",
            "lset",
            "ltrim",
            "rpop",
            "rpoplpush",
            "rpush",
            "rpushx",
        ],
    },
    CommandCategory {
        name: "PubSubBasedCmds",
        commands: &[
            "psubscribe",
            "publish",
            "pubsub",
            "punsubscribe",
            "spublish",
            "ssubscribe",
            "subscribe",
            "sunsubscribe",
            "unsubscribe",
        ],
    },
    CommandCategory {
        name: "SetBasedCmds",
        commands: &[
            "sadd",
            "scard",
            "sdiff",
            "sdiffstore",
            "sinter",
            "sintercard",
            "sinterstore",
            "sismember",
            "smembers",
            "smismember",
            "smove",
            "spop",
            "srandmember",
            "srem",
            "sscan",
            "sunion",
            "sunionstore",
        ],
    },
    CommandCategory {
        name: "SortedSetBasedCmds",
        commands: &[
            "bzmpop",
            "bzpopmax",
            "bzpopmin",
            "zadd",
            "zcard",
            "zcount",
            "zdiff",
            "zdiffstore",
            "zincrby",
            "zinter",
            "zintercard",
            "zinterstore",
            "zlexcount",
            "zmpop",
            "zmscore",
            "zpopmax",
            "zpopmin",
            "zrandmember",
            "zrange",
            "zrangebylex",
            "zrangebyscore",
            "zrangestore",
            "zrank",
            "zrem",
            "zremrangebylex",
            "zremrangebyrank",
            "zremrangebyscore",
            "zrevrange",
            "zrevrangebylex",
            "zrevrangebyscore",
            "zrevrank",
            "zscan",
            "zscore",
            "zunion",
            "zunionstore",
        ],
    },
    CommandCategory {
        name: "StringBasedCmds",
        commands: &[
            "append",
            "decr",
            "decrby",
            "get",
            "getdel",
            "getex",
            "getrange",
            "getset",
            "incr",
            "incrby",
            "incrbyfloat",
            "lcs",
            "mget",
            "mset",
            "msetnx",
            "psetex",
            "set",
            "setex",
            "setnx",
            "setrange",
            "strlen",
            "substr",
        ],
    },
    CommandCategory {
        name: "StreamBasedCmds",
        commands: &[
            "xack",
            "xadd",
            "xautoclaim",
            "xclaim",
            "xdel",
            "xgroup",
            "xinfo",
            "xlen",
            "xpending",
            "xrange",
            "xread",
            "xreadgroup",
            "xrevrange",
            "xsetid",
            "xtrim",
        ],
    },
    CommandCategory {
        name: "TransactionBasedCmds",
        commands: &["discard", "exec", "multi", "unwatch", "watch"],
    },
];
